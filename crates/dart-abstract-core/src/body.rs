//! Class body extraction by brace balancing.
//!
//! Braces inside string literals are not counted.

use crate::lexer::skip_string;

/// Byte range of a class body, exclusive of its braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySpan {
    /// First byte after the opening `{`.
    pub start: usize,
    /// Index of the matching `}`, or the input length when unbalanced.
    pub end: usize,
    /// False when input ended before the braces balanced.
    pub closed: bool,
}

/// Locates the body that opens at the first `{` at or after
/// `class_header_offset`.
///
/// Returns `None` only when there is no `{` to open a body. When the braces
/// never balance the span runs to end of input with `closed == false`.
#[must_use]
pub fn body_span(source: &str, class_header_offset: usize) -> Option<BodySpan> {
    let open = class_header_offset + source.get(class_header_offset..)?.find('{')?;
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut i = open;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(BodySpan {
                        start: open + 1,
                        end: i,
                        closed: true,
                    });
                }
            }
            _ => {}
        }
        i += 1;
    }

    Some(BodySpan {
        start: open + 1,
        end: source.len(),
        closed: false,
    })
}

/// Text strictly between the class's opening brace and its matching closing
/// brace.
///
/// Best effort: an unbalanced body yields the rest of the input, and a
/// missing opening brace yields an empty body. Never panics.
#[must_use]
pub fn extract_body(source: &str, class_header_offset: usize) -> &str {
    body_span(source, class_header_offset)
        .and_then(|span| source.get(span.start..span.end))
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_body() {
        let src = "class A { void f() { if (x) { y(); } } } trailing";
        assert_eq!(
            extract_body(src, 0),
            " void f() { if (x) { y(); } } "
        );
    }

    #[test]
    fn starts_at_offset() {
        let src = "void main() {} class B { int x; }";
        let offset = src.find("class").expect("has class");
        assert_eq!(extract_body(src, offset), " int x; ");
    }

    #[test]
    fn empty_body() {
        let span = body_span("class E {}", 0).expect("has body");
        assert_eq!(span.start, span.end);
        assert!(span.closed);
    }

    #[test]
    fn unbalanced_body_returns_remainder() {
        let src = "class A { void f() { ";
        let span = body_span(src, 0).expect("has body");
        assert!(!span.closed);
        assert_eq!(extract_body(src, 0), " void f() { ");
    }

    #[test]
    fn braces_in_strings_are_ignored() {
        let src = "class A { String s = '}'; String t = \"{{\"; int x; void f() {} } tail";
        assert_eq!(
            extract_body(src, 0),
            " String s = '}'; String t = \"{{\"; int x; void f() {} "
        );
        assert!(body_span(src, 0).is_some_and(|s| s.closed));
    }

    #[test]
    fn no_brace() {
        assert!(body_span("class A", 0).is_none());
        assert_eq!(extract_body("class A", 0), "");
        assert_eq!(extract_body("abc", 99), "");
    }
}
