//! Core types describing an extracted class and the generated output.

use serde::{Deserialize, Serialize};

/// Declaration line of a class, up to the opening body brace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassHeader {
    /// Class name.
    pub name: String,
    /// Superclass from the `extends` clause.
    pub extends_clause: Option<String>,
    /// Types listed in the `implements` clause, in source order.
    pub implements_clause: Option<Vec<String>>,
    /// Mixins listed in the `with` clause, in source order.
    pub with_clause: Option<Vec<String>>,
}

impl ClassHeader {
    /// Creates a header with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends_clause: None,
            implements_clause: None,
            with_clause: None,
        }
    }
}

/// A top-level data member of the class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Type expression, verbatim (e.g. `Stream<Iterable<Budget>>`).
    #[serde(rename = "type")]
    pub ty: String,
    /// Field name.
    pub name: String,
}

impl FieldDescriptor {
    /// Creates a new field descriptor.
    #[must_use]
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// A method, getter or setter of the class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Member name.
    pub name: String,
    /// Return type, verbatim. Empty when the source omits it.
    #[serde(default)]
    pub return_type: String,
    /// Raw parameter list including parentheses and method type parameters.
    /// Empty for getters.
    #[serde(default)]
    pub params: String,
    /// Raw body, either `=> expr;` or `{ ... }`.
    #[serde(default)]
    pub body: String,
    /// Declared with `get`.
    #[serde(default)]
    pub is_getter: bool,
    /// Declared with `set`.
    #[serde(default)]
    pub is_setter: bool,
    /// Declared `static`.
    #[serde(default)]
    pub is_static: bool,
    /// Body is marked `async` or `async*`.
    #[serde(default)]
    pub is_async: bool,
    /// Body is a generator (`async*` or `sync*`).
    #[serde(default)]
    pub is_generator: bool,
}

impl MethodDescriptor {
    /// Returns true for an ordinary method (neither getter nor setter).
    #[must_use]
    pub fn is_plain(&self) -> bool {
        !self.is_getter && !self.is_setter
    }

    /// Body modifier keyword to emit between the signature and the body.
    #[must_use]
    pub fn body_modifier(&self) -> Option<&'static str> {
        match (self.is_async, self.is_generator) {
            (true, false) => Some("async"),
            (true, true) => Some("async*"),
            (false, true) => Some("sync*"),
            (false, false) => None,
        }
    }
}

/// Everything an extraction strategy learns about one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassShape {
    /// Parsed class header.
    pub header: ClassHeader,
    /// Instance fields in source order.
    pub fields: Vec<FieldDescriptor>,
    /// Methods, getters and setters in source order.
    pub methods: Vec<MethodDescriptor>,
}

impl ClassShape {
    /// Drops members that must never reach generated output: private names
    /// and anything named like the class itself.
    #[must_use]
    pub fn into_public(mut self) -> Self {
        let class_name = self.header.name.as_str();
        self.fields
            .retain(|f| !is_private(&f.name) && f.name != class_name);
        self.methods
            .retain(|m| !is_private(&m.name) && m.name != class_name);
        self
    }
}

/// Generated interface and implementation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// `abstract class <prefix><Name> { ... }`
    pub interface_text: String,
    /// `class <Name><suffix> implements <prefix><Name> { ... }`
    pub concrete_text: String,
}

impl ConversionResult {
    /// Interface and implementation separated by a blank line.
    #[must_use]
    pub fn joined(&self) -> String {
        format!("{}\n\n{}", self.interface_text, self.concrete_text)
    }
}

/// Library-private identifiers start with an underscore.
#[must_use]
pub fn is_private(name: &str) -> bool {
    name.starts_with('_')
}
