//! Extraction through an external Dart AST helper.
//!
//! The helper receives the path of a temporary `.dart` file holding the
//! source and prints a JSON array with one object per class:
//!
//! ```text
//! [{ "name": "User",
//!    "fields":  [{ "name": "id", "type": "String" }],
//!    "methods": [{ "name": "save", "returnType": "void", "params": "()",
//!                  "body": "{}", "isGetter": false, "isSetter": false }] }]
//! ```
//!
//! An empty array means the file holds no class. A non-zero exit is a
//! failure and its stderr is reported as is.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConvertError;
use crate::strategy::ExtractionStrategy;
use crate::types::{ClassHeader, ClassShape, FieldDescriptor, MethodDescriptor};

/// Runs a helper program once per call and decodes its JSON output.
#[derive(Debug, Clone)]
pub struct AstToolStrategy {
    program: PathBuf,
    args: Vec<String>,
}

impl AstToolStrategy {
    /// Creates a strategy running `program` with no extra arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds an argument placed before the source file path.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds several arguments placed before the source file path.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The helper program.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ExtractionStrategy for AstToolStrategy {
    fn name(&self) -> &'static str {
        "ast"
    }

    fn extract(&self, source: &str) -> Result<Option<ClassShape>, ConvertError> {
        let mut file = tempfile::Builder::new()
            .prefix("dart-abstract-")
            .suffix(".dart")
            .tempfile()
            .map_err(ConvertError::TempFile)?;
        file.write_all(source.as_bytes())
            .and_then(|()| file.flush())
            .map_err(ConvertError::TempFile)?;

        info!(
            program = %self.program.display(),
            file = %file.path().display(),
            "running Dart AST helper"
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .output()
            .map_err(|source| ConvertError::ToolSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConvertError::ToolFailed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(bytes = stdout.len(), "helper output received");
        parse_tool_output(&stdout)
    }
}

#[derive(Debug, Deserialize)]
struct ToolClass {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
    #[serde(default)]
    methods: Vec<MethodDescriptor>,
}

/// Decodes the helper's JSON array. Only the first class is kept.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedOutput`] if the text is not an array of
/// class objects, or if a method of the kept class is flagged as both getter
/// and setter.
pub fn parse_tool_output(json: &str) -> Result<Option<ClassShape>, ConvertError> {
    let classes: Vec<ToolClass> =
        serde_json::from_str(json.trim()).map_err(|e| ConvertError::MalformedOutput {
            message: e.to_string(),
        })?;

    let Some(class) = classes.into_iter().next() else {
        return Ok(None);
    };
    if let Some(m) = class.methods.iter().find(|m| m.is_getter && m.is_setter) {
        return Err(ConvertError::MalformedOutput {
            message: format!(
                "method `{}` of class `{}` is marked as both getter and setter",
                m.name, class.name
            ),
        });
    }

    Ok(Some(ClassShape {
        header: ClassHeader::named(class.name),
        fields: class.fields,
        methods: class.methods,
    }))
}
