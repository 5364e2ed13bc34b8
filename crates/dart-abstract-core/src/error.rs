//! Conversion errors.

use std::path::PathBuf;
use std::process::ExitStatus;

use miette::Diagnostic;

/// Errors raised while extracting a class through a strategy.
///
/// Not finding a class is never an error; it is reported as `Ok(None)`.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConvertError {
    /// The external AST helper exited unsuccessfully.
    #[error("Dart AST parser failed ({status}): {stderr}")]
    #[diagnostic(
        code(dart_abstract::tool_failed),
        help("run the helper by hand on the file to see its full output")
    )]
    ToolFailed {
        /// Program that was run.
        program: PathBuf,
        /// Exit status.
        status: ExitStatus,
        /// Diagnostic output, verbatim.
        stderr: String,
    },

    /// The external AST helper could not be started.
    #[error("Dart AST parser failed: could not run {}: {source}", .program.display())]
    #[diagnostic(
        code(dart_abstract::tool_spawn),
        help("check `extractor.command` in the config or pass --extractor")
    )]
    ToolSpawn {
        /// Program that was run.
        program: PathBuf,
        /// Spawn error.
        source: std::io::Error,
    },

    /// The helper succeeded but printed something other than the expected JSON.
    #[error("Dart AST parser returned malformed output: {message}")]
    #[diagnostic(code(dart_abstract::malformed_output))]
    MalformedOutput {
        /// Decoder message.
        message: String,
    },

    /// The temporary source file could not be written.
    #[error("failed to write temporary source file: {0}")]
    #[diagnostic(code(dart_abstract::temp_file))]
    TempFile(#[source] std::io::Error),
}

impl ConvertError {
    /// True for every failure that originates in the external helper.
    #[must_use]
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            Self::ToolFailed { .. } | Self::ToolSpawn { .. } | Self::MalformedOutput { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failure_family() {
        let spawn = ConvertError::ToolSpawn {
            program: PathBuf::from("dart-ast"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(spawn.is_tool_failure());
        assert!(spawn.to_string().contains("Dart AST parser failed"));

        let malformed = ConvertError::MalformedOutput {
            message: "expected value".into(),
        };
        assert!(malformed.is_tool_failure());

        let temp = ConvertError::TempFile(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(!temp.is_tool_failure());
    }
}
