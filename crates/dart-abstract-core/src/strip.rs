//! Comment stripping.
//!
//! Comments are blanked rather than cut: each removed character becomes a
//! space (line breaks are kept), so an offset into the stripped text is the
//! same offset into the original. The header matcher relies on this to
//! hand its position back to the body extractor, and the classifier relies
//! on it to copy method bodies out of the original text.

use crate::lexer::skip_string;

/// Removes `//` line comments and `/* ... */` block comments.
///
/// Block comments do not nest; the first `*/` closes them. Comment markers
/// inside string literals are left alone, except in interpolations that
/// reuse the enclosing quote (`'${m['k']}'`), which is a known limitation.
#[must_use]
pub fn strip_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = source[i..].find('\n').map_or(bytes.len(), |n| i + n);
                out.push_str(&source[copied..i]);
                blank(&mut out, &bytes[i..end]);
                copied = end;
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |n| i + 2 + n + 2);
                out.push_str(&source[copied..i]);
                blank(&mut out, &bytes[i..end]);
                copied = end;
                i = end;
            }
            b'\'' | b'"' => i = skip_string(bytes, i),
            _ => i += 1,
        }
    }

    out.push_str(&source[copied..]);
    out
}

fn blank(out: &mut String, comment: &[u8]) {
    for &b in comment {
        out.push(if b == b'\n' || b == b'\r' { b as char } else { ' ' });
    }
}
