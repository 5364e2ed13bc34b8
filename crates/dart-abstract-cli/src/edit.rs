//! Materializing generated code into a document.

use std::ops::Range;
use std::str::FromStr;

/// What to do with the generated code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Action {
    /// Replace the selection, or the whole document without one.
    Replace,
    /// Insert below the selection, or at the end of the document.
    Insert,
    /// Leave the document alone and print the code.
    #[default]
    Copy,
}

/// Result of applying an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// The full edited document.
    Document(String),
    /// Code for the clipboard; the document is unchanged.
    Clipboard(String),
}

/// Applies `action` to `document`, where `selection` is the byte range the
/// code was generated from (`None` for the whole document).
///
/// Out-of-range selections are clamped to the document.
#[must_use]
pub fn apply(
    action: Action,
    document: &str,
    selection: Option<Range<usize>>,
    output: &str,
) -> Materialized {
    let selection = selection.map(|r| clamp(document, r));
    match action {
        Action::Replace => {
            let range = selection.unwrap_or(0..document.len());
            Materialized::Document(splice(document, range, output))
        }
        Action::Insert => {
            let at = selection.map_or(document.len(), |r| r.end);
            Materialized::Document(splice(document, at..at, &format!("\n\n{output}")))
        }
        Action::Copy => Materialized::Clipboard(output.to_owned()),
    }
}

fn splice(document: &str, range: Range<usize>, text: &str) -> String {
    let mut out = String::with_capacity(document.len() + text.len());
    out.push_str(&document[..range.start]);
    out.push_str(text);
    out.push_str(&document[range.end..]);
    out
}

fn clamp(document: &str, range: Range<usize>) -> Range<usize> {
    let floor = |mut i: usize| {
        i = i.min(document.len());
        while !document.is_char_boundary(i) {
            i -= 1;
        }
        i
    };
    let end = floor(range.end);
    floor(range.start).min(end)..end
}

/// Inclusive, 1-based line range given as `A:B` or `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First line.
    pub start: usize,
    /// Last line.
    pub end: usize,
}

impl LineRange {
    /// Byte range covering the lines, without the last line's terminator.
    ///
    /// Returns `None` if the first line lies past the end of the document.
    /// A final newline does not start another line. A last line past the end
    /// is clamped to the document's last line.
    #[must_use]
    pub fn byte_range(&self, document: &str) -> Option<Range<usize>> {
        let mut line_starts = vec![0];
        line_starts.extend(
            document
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        if document.ends_with('\n') {
            line_starts.pop();
        }

        let start = *line_starts.get(self.start.checked_sub(1)?)?;
        let mut end = line_starts
            .get(self.end)
            .map_or(document.len(), |next| next - 1);
        if document[..end].ends_with('\n') {
            end -= 1;
        }
        if document[..end].ends_with('\r') {
            end -= 1;
        }
        Some(start..end.max(start))
    }
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| format!("invalid line number {part:?} (lines start at 1)"))
        };
        let (start, end) = match s.split_once(':') {
            Some((a, b)) => (parse(a)?, parse(b)?),
            None => {
                let n = parse(s)?;
                (n, n)
            }
        };
        if end < start {
            return Err(format!("line range {s:?} ends before it starts"));
        }
        Ok(Self { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "import 'a.dart';\nclass A {}\nvoid main() {}\n";

    #[test]
    fn replace_whole_document() {
        assert_eq!(
            apply(Action::Replace, DOC, None, "OUT"),
            Materialized::Document("OUT".to_string())
        );
    }

    #[test]
    fn replace_selection() {
        let sel = LineRange { start: 2, end: 2 }.byte_range(DOC);
        assert_eq!(
            apply(Action::Replace, DOC, sel, "OUT"),
            Materialized::Document("import 'a.dart';\nOUT\nvoid main() {}\n".to_string())
        );
    }

    #[test]
    fn insert_after_selection() {
        let sel = LineRange { start: 2, end: 2 }.byte_range(DOC);
        assert_eq!(
            apply(Action::Insert, DOC, sel, "OUT"),
            Materialized::Document(
                "import 'a.dart';\nclass A {}\n\nOUT\nvoid main() {}\n".to_string()
            )
        );
    }

    #[test]
    fn insert_at_end_without_selection() {
        assert_eq!(
            apply(Action::Insert, "class A {}", None, "OUT"),
            Materialized::Document("class A {}\n\nOUT".to_string())
        );
    }

    #[test]
    fn copy_leaves_document_alone() {
        assert_eq!(
            apply(Action::Copy, DOC, None, "OUT"),
            Materialized::Clipboard("OUT".to_string())
        );
    }

    #[test]
    fn out_of_range_selection_is_clamped() {
        assert_eq!(
            apply(Action::Replace, "abc", Some(1..99), "X"),
            Materialized::Document("aX".to_string())
        );
    }

    #[test]
    fn line_range_parsing() {
        assert_eq!("3:7".parse(), Ok(LineRange { start: 3, end: 7 }));
        assert_eq!("4".parse(), Ok(LineRange { start: 4, end: 4 }));
        assert!("0:2".parse::<LineRange>().is_err());
        assert!("5:2".parse::<LineRange>().is_err());
        assert!("a:b".parse::<LineRange>().is_err());
    }

    #[test]
    fn byte_range_bounds() {
        let range = LineRange { start: 2, end: 3 }.byte_range(DOC).unwrap();
        assert_eq!(&DOC[range], "class A {}\nvoid main() {}");

        let range = LineRange { start: 3, end: 50 }.byte_range(DOC).unwrap();
        assert_eq!(&DOC[range], "void main() {}");

        assert!(LineRange { start: 9, end: 9 }.byte_range(DOC).is_none());
    }

    #[test]
    fn final_newline_does_not_add_a_line() {
        assert!(LineRange { start: 4, end: 4 }.byte_range(DOC).is_none());

        let doc = "a\r\nb\r\n";
        assert!(LineRange { start: 3, end: 3 }.byte_range(doc).is_none());
        let range = LineRange { start: 2, end: 7 }.byte_range(doc).unwrap();
        assert_eq!(&doc[range], "b");
    }

    #[test]
    fn byte_range_strips_carriage_return() {
        let doc = "a\r\nb\r\n";
        let range = LineRange { start: 1, end: 1 }.byte_range(doc).unwrap();
        assert_eq!(&doc[range], "a");
    }
}
