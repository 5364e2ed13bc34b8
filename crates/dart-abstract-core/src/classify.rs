//! Member classification.
//!
//! The class body is cut into top-level declarations by a small bracket
//! counting scanner, then each declaration is read left to right:
//! annotations, modifiers, an optional type, an optional `get`/`set`, the
//! name, and finally whatever decides its kind (`(` for methods, `=`, `;`
//! or `,` for fields, `=>` or `{` for bodies).
//!
//! Structure is read from a comment-blanked copy of the body. Parameter
//! lists and bodies are sliced from the original text at the same offsets,
//! so they keep their comments and formatting.

use std::ops::Range;

use crate::lexer::{is_ident_continue, is_ident_start, skip_string, Cursor};
use crate::strip::strip_comments;
use crate::types::{is_private, FieldDescriptor, MethodDescriptor};

/// Fields and methods of one class body, each in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Members {
    /// Instance fields.
    pub fields: Vec<FieldDescriptor>,
    /// Methods, getters and setters.
    pub methods: Vec<MethodDescriptor>,
}

/// Words that can open a line of code but never a member type.
const NOT_A_TYPE: &[&str] = &[
    "abstract", "assert", "await", "break", "case", "catch", "class", "continue", "default", "do",
    "else", "enum", "export", "extension", "factory", "finally", "for", "if", "import", "library",
    "mixin", "new", "operator", "part", "rethrow", "return", "switch", "throw", "try", "typedef",
    "while", "yield",
];

/// Splits a class body into fields and methods.
///
/// Constructors, private members, operators, abstract members and anything
/// nested inside another member are left out. Never fails: text that holds
/// no recognizable declaration yields empty sequences.
#[must_use]
pub fn classify(body: &str, class_name: &str) -> Members {
    let text = strip_comments(body);
    let mut members = Members::default();

    for span in declarations(&text) {
        let parser = DeclParser {
            text: &text[..span.end],
            original: body,
            class_name,
        };
        match parser.parse(span.start) {
            Some(Declaration::Fields(fields)) => members.fields.extend(fields),
            Some(Declaration::Method(method)) => members.methods.push(method),
            None => {}
        }
    }

    members
}

#[derive(Debug, Default, Clone, Copy)]
struct Depth {
    paren: usize,
    bracket: usize,
    brace: usize,
}

impl Depth {
    fn is_top(self) -> bool {
        self.paren == 0 && self.bracket == 0 && self.brace == 0
    }
}

/// Byte ranges of the top-level declarations in a (comment-blanked) body.
///
/// A declaration ends at a top-level `;`, or at the `}` closing a top-level
/// block body. Once an initializer (`=` before any parameter list) or an
/// `=>` body has started, only `;` ends it, so braces in map literals and
/// closures stay inside.
fn declarations(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    let mut depth = Depth::default();
    let mut expression = false;
    let mut saw_params = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let Some(s) = start else {
            if !b.is_ascii_whitespace() && b != b';' && b != b'}' {
                start = Some(i);
                depth = Depth::default();
                expression = false;
                saw_params = false;
                continue;
            }
            i += 1;
            continue;
        };

        match b {
            b'\'' | b'"' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'(' => {
                if depth.is_top() {
                    saw_params = true;
                }
                depth.paren += 1;
            }
            b')' => depth.paren = depth.paren.saturating_sub(1),
            b'[' => depth.bracket += 1,
            b']' => depth.bracket = depth.bracket.saturating_sub(1),
            b'{' => depth.brace += 1,
            b'}' => {
                depth.brace = depth.brace.saturating_sub(1);
                if depth.is_top() && !expression {
                    spans.push(s..i + 1);
                    start = None;
                }
            }
            b'=' if depth.is_top() => {
                if bytes.get(i + 1) == Some(&b'>') {
                    expression = true;
                    i += 2;
                    continue;
                }
                let prev = if i > 0 { bytes[i - 1] } else { b' ' };
                let comparison =
                    bytes.get(i + 1) == Some(&b'=') || matches!(prev, b'=' | b'!' | b'<' | b'>');
                if !comparison && !saw_params {
                    expression = true;
                }
            }
            b';' if depth.is_top() => {
                spans.push(s..i + 1);
                start = None;
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(s) = start {
        spans.push(s..bytes.len());
    }
    spans
}

enum Declaration {
    Fields(Vec<FieldDescriptor>),
    Method(MethodDescriptor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessor {
    Getter,
    Setter,
}

#[derive(Debug, Default, Clone, Copy)]
struct Modifiers {
    is_static: bool,
    /// `var`, `final` or `const`: the type may be omitted.
    inferable: bool,
}

impl Modifiers {
    fn read(c: &mut Cursor<'_>) -> Self {
        let mut mods = Self::default();
        loop {
            c.skip_ws();
            if c.eat_keyword("static") {
                mods.is_static = true;
            } else if c.eat_keyword("final") || c.eat_keyword("const") || c.eat_keyword("var") {
                mods.inferable = true;
            } else if !(c.eat_keyword("late")
                || c.eat_keyword("external")
                || c.eat_keyword("covariant"))
            {
                return mods;
            }
        }
    }
}

struct DeclParser<'a> {
    /// Comment-blanked text, cut off at the end of this declaration.
    text: &'a str,
    /// Original body text, same offsets.
    original: &'a str,
    class_name: &'a str,
}

impl<'a> DeclParser<'a> {
    fn parse(&self, start: usize) -> Option<Declaration> {
        let mut c = Cursor::at(self.text, start);
        skip_annotations(&mut c)?;
        let mods = Modifiers::read(&mut c);
        c.skip_ws();

        if c.peek_ident().is_some_and(|w| NOT_A_TYPE.contains(&w)) {
            return None;
        }

        if let Some(kind) = accessor_keyword(&mut c) {
            return self.accessor(c, "", kind, mods);
        }

        let first_start = c.pos();
        let first = c.type_expr()?;
        c.skip_ws();

        match c.peek() {
            Some(b'(') => self.untyped_method(c, first_start, first, mods),
            Some(b'=' | b';' | b',')
                if mods.inferable && !c.starts_with("=>") && is_plain_ident(first) =>
            {
                self.fields(c, "dynamic", first, mods)
            }
            Some(_) => {
                if let Some(kind) = accessor_keyword(&mut c) {
                    return self.accessor(c, first, kind, mods);
                }
                let name = c.ident()?;
                if name == "operator" {
                    return None;
                }
                c.skip_ws();
                match c.peek() {
                    Some(b'(' | b'<') => {
                        let params_start = c.pos();
                        self.method(c, params_start, first, name, mods)
                    }
                    Some(b'=' | b';' | b',') if !c.starts_with("=>") => {
                        self.fields(c, first, name, mods)
                    }
                    _ => None,
                }
            }
            None => None,
        }
    }

    /// `name(...)` with no return type: a constructor or an untyped method.
    fn untyped_method(
        &self,
        c: Cursor<'a>,
        first_start: usize,
        first: &'a str,
        mods: Modifiers,
    ) -> Option<Declaration> {
        let (name, params_start) = match first.find('<') {
            Some(lt) => (&first[..lt], first_start + lt),
            None => (first, c.pos()),
        };
        if name.contains('.') {
            return None;
        }
        self.method(c, params_start, "", name, mods)
    }

    fn method(
        &self,
        mut c: Cursor<'a>,
        params_start: usize,
        return_type: &str,
        name: &str,
        mods: Modifiers,
    ) -> Option<Declaration> {
        if is_private(name) || name == self.class_name {
            return None;
        }
        if c.peek() == Some(b'<') {
            c.balanced(b'<', b'>')?;
            c.skip_ws();
        }
        let params = c.balanced(b'(', b')')?;
        if params.contains("this.") || params.contains("super.") {
            return None;
        }
        let params = self.original(params_start..c.pos());
        let (is_async, is_generator) = body_modifiers(&mut c);
        let body = self.body(&mut c)?;

        Some(Declaration::Method(MethodDescriptor {
            name: name.to_owned(),
            return_type: return_type.to_owned(),
            params,
            body,
            is_getter: false,
            is_setter: false,
            is_static: mods.is_static,
            is_async,
            is_generator,
        }))
    }

    fn accessor(
        &self,
        mut c: Cursor<'a>,
        return_type: &str,
        kind: Accessor,
        mods: Modifiers,
    ) -> Option<Declaration> {
        let name = c.ident()?;
        if is_private(name) {
            return None;
        }
        c.skip_ws();
        let params = match kind {
            Accessor::Getter => String::new(),
            Accessor::Setter => {
                let start = c.pos();
                c.balanced(b'(', b')')?;
                self.original(start..c.pos())
            }
        };
        let (is_async, is_generator) = body_modifiers(&mut c);
        let body = self.body(&mut c)?;

        Some(Declaration::Method(MethodDescriptor {
            name: name.to_owned(),
            return_type: return_type.to_owned(),
            params,
            body,
            is_getter: kind == Accessor::Getter,
            is_setter: kind == Accessor::Setter,
            is_static: mods.is_static,
            is_async,
            is_generator,
        }))
    }

    /// `Type a [= x], b [= y];` with the cursor just past the first name.
    fn fields(
        &self,
        mut c: Cursor<'a>,
        ty: &str,
        first_name: &'a str,
        mods: Modifiers,
    ) -> Option<Declaration> {
        if mods.is_static {
            return None;
        }
        let mut names = vec![first_name];
        loop {
            c.skip_ws();
            match c.peek() {
                Some(b'=') => {
                    c.bump();
                    c.skip_until_top_level(b",;");
                }
                Some(b',') => {
                    c.bump();
                    c.skip_ws();
                    names.push(c.ident()?);
                }
                Some(b';') | None => break,
                Some(_) => return None,
            }
        }

        Some(Declaration::Fields(
            names
                .into_iter()
                .filter(|n| !is_private(n) && *n != self.class_name)
                .map(|n| FieldDescriptor::new(ty, n))
                .collect(),
        ))
    }

    /// `=> expr;` or `{ ... }` up to the end of the declaration, verbatim.
    fn body(&self, c: &mut Cursor<'a>) -> Option<String> {
        c.skip_ws();
        if c.starts_with("=>") || c.peek() == Some(b'{') {
            Some(self.original(c.pos()..self.text.len()).trim_end().to_owned())
        } else {
            None
        }
    }

    fn original(&self, range: Range<usize>) -> String {
        self.original.get(range).unwrap_or_default().to_owned()
    }
}

fn skip_annotations(c: &mut Cursor<'_>) -> Option<()> {
    loop {
        c.skip_ws();
        if !c.eat(b'@') {
            return Some(());
        }
        c.qualified_ident()?;
        if c.peek() == Some(b'(') {
            c.balanced(b'(', b')')?;
        }
    }
}

/// Consumes `get name` / `set name` up to the name. A field that happens to
/// be called `get` is left alone.
fn accessor_keyword(c: &mut Cursor<'_>) -> Option<Accessor> {
    for (kw, kind) in [("get", Accessor::Getter), ("set", Accessor::Setter)] {
        if !c.at_keyword(kw) {
            continue;
        }
        let save = c.pos();
        c.eat_keyword(kw);
        c.skip_ws();
        if c.peek().is_some_and(is_ident_start) {
            return Some(kind);
        }
        c.set_pos(save);
    }
    None
}

/// `async`, `async*` or `sync*` before a body: `(is_async, is_generator)`.
fn body_modifiers(c: &mut Cursor<'_>) -> (bool, bool) {
    c.skip_ws();
    if c.eat_keyword("async") {
        c.skip_ws();
        let generator = c.eat(b'*');
        return (true, generator);
    }
    let save = c.pos();
    if c.eat_keyword("sync") {
        c.skip_ws();
        if c.eat(b'*') {
            return (false, true);
        }
        c.set_pos(save);
    }
    (false, false)
}

fn is_plain_ident(s: &str) -> bool {
    s.bytes().next().is_some_and(is_ident_start) && s.bytes().all(is_ident_continue)
}
