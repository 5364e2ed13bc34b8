//! Byte-level cursor shared by the header matcher and member classifier.
//!
//! All positions are byte offsets. The cursor only stops on ASCII
//! delimiters or identifier boundaries, so every slice it hands out lies on
//! a char boundary.

/// Returns true if `b` can start a Dart identifier.
#[must_use]
pub fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

/// Returns true if `b` can continue a Dart identifier.
#[must_use]
pub fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Skips a string literal whose opening quote is at `start`.
///
/// Handles single, double and triple quotes, the `r` raw prefix and
/// backslash escapes. A single-line string without a closing quote ends at
/// the newline. Returns the index just past the literal.
pub(crate) fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let raw = start > 0
        && bytes[start - 1] == b'r'
        && (start == 1 || !is_ident_continue(bytes[start - 2]));
    let triple = bytes.get(start..start + 3) == Some(&[quote, quote, quote][..]);

    let mut i = if triple { start + 3 } else { start + 1 };
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' && !raw {
            i += 2;
            continue;
        }
        if triple {
            if bytes.get(i..i + 3) == Some(&[quote, quote, quote][..]) {
                return i + 3;
            }
        } else if b == quote {
            return i + 1;
        } else if b == b'\n' {
            return i;
        }
        i += 1;
    }
    bytes.len()
}

/// Forward-only cursor over a source slice.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor positioned at `pos` within `src`.
    pub(crate) fn at(src: &'a str, pos: usize) -> Self {
        Self {
            src,
            pos: pos.min(src.len()),
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + n).copied()
    }

    pub(crate) fn bump(&mut self) {
        if self.pos < self.src.len() {
            self.pos += 1;
        }
    }

    pub(crate) fn starts_with(&self, s: &str) -> bool {
        self.src.as_bytes()[self.pos..].starts_with(s.as_bytes())
    }

    pub(crate) fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// True if the next token is exactly `kw` (not a prefix of a longer word).
    pub(crate) fn at_keyword(&self, kw: &str) -> bool {
        self.starts_with(kw)
            && !self
                .src
                .as_bytes()
                .get(self.pos + kw.len())
                .copied()
                .is_some_and(is_ident_continue)
    }

    pub(crate) fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.pos += kw.len();
            true
        } else {
            false
        }
    }

    /// Identifier starting at the cursor, without consuming it.
    pub(crate) fn peek_ident(&self) -> Option<&'a str> {
        let bytes = self.src.as_bytes();
        if !bytes.get(self.pos).copied().is_some_and(is_ident_start) {
            return None;
        }
        let mut end = self.pos + 1;
        while bytes.get(end).copied().is_some_and(is_ident_continue) {
            end += 1;
        }
        Some(&self.src[self.pos..end])
    }

    pub(crate) fn ident(&mut self) -> Option<&'a str> {
        let id = self.peek_ident()?;
        self.pos += id.len();
        Some(id)
    }

    /// `a.b.c`, returned as one slice.
    pub(crate) fn qualified_ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        self.ident()?;
        while self.peek() == Some(b'.') && self.peek_at(1).is_some_and(is_ident_start) {
            self.pos += 1;
            self.ident()?;
        }
        Some(&self.src[start..self.pos])
    }

    /// Consumes a balanced `open ... close` group, nesting on `open`.
    ///
    /// The cursor must sit on `open`. Parentheses and braces skip string
    /// literals; angle brackets do not, since type arguments never contain
    /// strings. Returns the group including its delimiters, or `None` (with
    /// the cursor unmoved) if the group never closes.
    pub(crate) fn balanced(&mut self, open: u8, close: u8) -> Option<&'a str> {
        if self.peek() != Some(open) {
            return None;
        }
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut depth = 0usize;
        let mut i = start;
        while i < bytes.len() {
            let b = bytes[i];
            if open != b'<' && (b == b'\'' || b == b'"') {
                i = skip_string(bytes, i);
                continue;
            }
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    self.pos = i + 1;
                    return Some(&self.src[start..self.pos]);
                }
            }
            i += 1;
        }
        None
    }

    /// Reads a type expression: `Name`, `prefix.Name`, `Name<Args>`, record
    /// types `(A, B)`, function types `R Function(P)`, each with an optional
    /// trailing `?`.
    ///
    /// Type arguments are matched by depth, so `Stream<Iterable<Budget>>`
    /// is read whole instead of stopping at the first `>`.
    pub(crate) fn type_expr(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if self.peek() == Some(b'(') {
            if self.balanced(b'(', b')').is_none() {
                self.pos = start;
                return None;
            }
        } else {
            if self.qualified_ident().is_none() {
                self.pos = start;
                return None;
            }
            if self.peek() == Some(b'<') && self.balanced(b'<', b'>').is_none() {
                self.pos = start;
                return None;
            }
        }
        self.eat(b'?');
        self.function_type_suffix();
        Some(&self.src[start..self.pos])
    }

    /// `Function<T>(params)?` following a return type.
    fn function_type_suffix(&mut self) {
        let save = self.pos;
        self.skip_ws();
        if !self.eat_keyword("Function") {
            self.pos = save;
            return;
        }
        self.skip_ws();
        if self.peek() == Some(b'<') && self.balanced(b'<', b'>').is_none() {
            self.pos = save;
            return;
        }
        self.skip_ws();
        if self.balanced(b'(', b')').is_none() {
            self.pos = save;
            return;
        }
        self.eat(b'?');
    }

    /// Advances to the next top-level occurrence of one of `stops`, skipping
    /// nested brackets and string literals. Stops at end of input otherwise.
    pub(crate) fn skip_until_top_level(&mut self, stops: &[u8]) {
        let bytes = self.src.as_bytes();
        let mut depth = 0usize;
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if depth == 0 && stops.contains(&b) {
                return;
            }
            match b {
                b'\'' | b'"' => {
                    self.pos = skip_string(bytes, self.pos);
                    continue;
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_type(src: &str) -> Option<&str> {
        Cursor::at(src, 0).type_expr()
    }

    #[test]
    fn nested_generics_are_read_whole() {
        assert_eq!(
            read_type("Stream<Iterable<Budget>> watch()"),
            Some("Stream<Iterable<Budget>>")
        );
        assert_eq!(
            read_type("Map<String, List<int>>? cache;"),
            Some("Map<String, List<int>>?")
        );
    }

    #[test]
    fn function_and_record_types() {
        assert_eq!(
            read_type("void Function(int, String)? onDone;"),
            Some("void Function(int, String)?")
        );
        assert_eq!(read_type("(int, String) get pair"), Some("(int, String)"));
    }

    #[test]
    fn prefixed_type() {
        assert_eq!(read_type("http.Client client;"), Some("http.Client"));
    }

    #[test]
    fn unclosed_generic_is_rejected() {
        let mut c = Cursor::at("List<int x;", 0);
        assert_eq!(c.type_expr(), None);
        assert_eq!(c.pos(), 0);
    }

    #[test]
    fn keyword_requires_word_boundary() {
        let c = Cursor::at("getter", 0);
        assert!(!c.at_keyword("get"));
        let c = Cursor::at("get x", 0);
        assert!(c.at_keyword("get"));
    }

    #[test]
    fn balanced_parens_skip_strings() {
        let mut c = Cursor::at("(String s = ')') {}", 0);
        assert_eq!(c.balanced(b'(', b')'), Some("(String s = ')')"));
    }

    #[test]
    fn skip_string_variants() {
        let src = br#"'a\'b' x"#;
        assert_eq!(skip_string(src, 0), 6);
        let src = b"r'a\\' x";
        assert_eq!(skip_string(src, 1), 5);
        let src = b"'''a\n'b''' x";
        assert_eq!(skip_string(src, 0), 10);
        let src = b"'open\nnext";
        assert_eq!(skip_string(src, 0), 5);
    }

    #[test]
    fn skip_until_top_level_ignores_nested_commas() {
        let src = "= f(a, b), next;";
        let mut c = Cursor::at(src, 0);
        c.skip_until_top_level(b",;");
        assert_eq!(c.pos(), 9);
    }
}
