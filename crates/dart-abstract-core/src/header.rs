//! Class header matching.

use crate::lexer::{is_ident_continue, Cursor};
use crate::types::ClassHeader;

/// A matched class header and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    /// Parsed header.
    pub header: ClassHeader,
    /// Byte offset of the `class` keyword.
    pub offset: usize,
}

/// Finds the first `class Name [extends T] [implements A, B] [with M] {`.
///
/// Expects comment-stripped text. An occurrence of `class` that does not
/// form a complete header (a generic class, a word inside an identifier)
/// is skipped and the search continues. `None` means the text holds no
/// class to convert.
#[must_use]
pub fn match_header(stripped: &str) -> Option<HeaderMatch> {
    let bytes = stripped.as_bytes();
    let mut from = 0;

    while let Some(rel) = stripped[from..].find("class") {
        let offset = from + rel;
        from = offset + "class".len();

        if offset > 0 && is_ident_continue(bytes[offset - 1]) {
            continue;
        }
        if let Some(header) = parse_header(stripped, offset) {
            return Some(HeaderMatch { header, offset });
        }
    }

    None
}

fn parse_header(src: &str, offset: usize) -> Option<ClassHeader> {
    let mut c = Cursor::at(src, offset + "class".len());
    if !c.peek().is_some_and(|b| b.is_ascii_whitespace()) {
        return None;
    }
    c.skip_ws();

    let mut header = ClassHeader::named(c.ident()?);

    loop {
        c.skip_ws();
        if c.eat(b'{') {
            return Some(header);
        }

        let nothing_yet = header.extends_clause.is_none()
            && header.implements_clause.is_none()
            && header.with_clause.is_none();

        if nothing_yet && c.eat_keyword("extends") {
            c.skip_ws();
            header.extends_clause = Some(c.type_expr()?.to_owned());
        } else if header.implements_clause.is_none() && c.eat_keyword("implements") {
            header.implements_clause = Some(type_list(&mut c)?);
        } else if header.with_clause.is_none() && c.eat_keyword("with") {
            header.with_clause = Some(type_list(&mut c)?);
        } else {
            return None;
        }
    }
}

fn type_list(c: &mut Cursor<'_>) -> Option<Vec<String>> {
    let mut types = Vec::new();
    loop {
        c.skip_ws();
        types.push(c.type_expr()?.to_owned());
        c.skip_ws();
        if !c.eat(b',') {
            return Some(types);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(src: &str) -> Option<ClassHeader> {
        match_header(src).map(|m| m.header)
    }

    #[test]
    fn plain_class() {
        let m = match_header("  class User {}").expect("should match");
        assert_eq!(m.header.name, "User");
        assert_eq!(m.offset, 2);
        assert!(m.header.extends_clause.is_none());
    }

    #[test]
    fn all_clauses() {
        let h = header("class A extends B implements C, D with E, F {").expect("should match");
        assert_eq!(h.extends_clause.as_deref(), Some("B"));
        assert_eq!(
            h.implements_clause,
            Some(vec!["C".to_owned(), "D".to_owned()])
        );
        assert_eq!(h.with_clause, Some(vec!["E".to_owned(), "F".to_owned()]));
    }

    #[test]
    fn with_before_implements() {
        let h = header("class A extends B with M implements I {").expect("should match");
        assert_eq!(h.with_clause, Some(vec!["M".to_owned()]));
        assert_eq!(h.implements_clause, Some(vec!["I".to_owned()]));
    }

    #[test]
    fn generic_supertype() {
        let h = header("class Bloc extends Cubit<List<Item>> {").expect("should match");
        assert_eq!(h.extends_clause.as_deref(), Some("Cubit<List<Item>>"));
    }

    #[test]
    fn modifiers_before_class_are_ignored() {
        let h = header("abstract base class Repo {").expect("should match");
        assert_eq!(h.name, "Repo");
    }

    #[test]
    fn skips_incomplete_occurrences() {
        let src = "final subclass = 1; // classes\nclass Real {}";
        assert_eq!(header(src).map(|h| h.name), Some("Real".to_owned()));
    }

    #[test]
    fn no_class() {
        assert!(match_header("void main() {}").is_none());
        assert!(match_header("").is_none());
        assert!(match_header("class {").is_none());
        assert!(match_header("class Foo").is_none());
    }
}
