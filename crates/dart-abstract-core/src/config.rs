//! Configuration types for dart-abstract.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::external::AstToolStrategy;
use crate::lexer::{is_ident_continue, is_ident_start};
use crate::strategy::{ExtractionStrategy, TextStrategy};

/// Top-level configuration, as read from `dart-abstract.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Names of the generated classes.
    #[serde(default)]
    pub naming: Naming,

    /// How classes are extracted from source text.
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails [`Config::validate`].
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot produce valid Dart.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.naming.validate()?;
        if self.extractor.strategy == StrategyKind::Ast && self.extractor.command.is_none() {
            return Err(ConfigError::Validation(
                "extractor.strategy = \"ast\" requires extractor.command".to_string(),
            ));
        }
        Ok(())
    }
}

/// Prefix and suffix used to name the generated classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Naming {
    /// Prepended to the class name to form the interface name.
    #[serde(default = "default_prefix")]
    pub interface_prefix: String,

    /// Appended to the class name to form the implementation name.
    #[serde(default = "default_suffix")]
    pub implementation_suffix: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            interface_prefix: default_prefix(),
            implementation_suffix: default_suffix(),
        }
    }
}

fn default_prefix() -> String {
    "I".to_string()
}

fn default_suffix() -> String {
    "Impl".to_string()
}

impl Naming {
    /// Creates a naming scheme from a prefix and a suffix.
    #[must_use]
    pub fn new(interface_prefix: impl Into<String>, implementation_suffix: impl Into<String>) -> Self {
        Self {
            interface_prefix: interface_prefix.into(),
            implementation_suffix: implementation_suffix.into(),
        }
    }

    /// `<prefix><class_name>`
    #[must_use]
    pub fn interface_name(&self, class_name: &str) -> String {
        format!("{}{class_name}", self.interface_prefix)
    }

    /// `<class_name><suffix>`
    #[must_use]
    pub fn implementation_name(&self, class_name: &str) -> String {
        format!("{class_name}{}", self.implementation_suffix)
    }

    /// Rejects affixes that would produce invalid or colliding names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for non-identifier characters, a
    /// prefix starting with a digit, or both affixes empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interface_prefix.is_empty() && self.implementation_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "interface_prefix and implementation_suffix cannot both be empty".to_string(),
            ));
        }
        for (key, value) in [
            ("interface_prefix", &self.interface_prefix),
            ("implementation_suffix", &self.implementation_suffix),
        ] {
            if !value.bytes().all(is_ident_continue) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a Dart identifier fragment, got {value:?}"
                )));
            }
        }
        if self
            .interface_prefix
            .bytes()
            .next()
            .is_some_and(|b| !is_ident_start(b))
        {
            return Err(ConfigError::Validation(format!(
                "interface_prefix cannot start with a digit, got {:?}",
                self.interface_prefix
            )));
        }
        Ok(())
    }
}

/// Which extraction strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Built-in text scanner.
    #[default]
    Text,
    /// External AST helper program.
    Ast,
}

/// Extraction settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Strategy to use (default: `text`).
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Helper program for the `ast` strategy.
    #[serde(default)]
    pub command: Option<PathBuf>,

    /// Arguments passed to the helper before the source file path.
    #[serde(default)]
    pub args: Vec<String>,
}

impl ExtractorConfig {
    /// Instantiates the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the `ast` strategy has no command.
    pub fn build(&self) -> Result<Box<dyn ExtractionStrategy>, ConfigError> {
        match self.strategy {
            StrategyKind::Text => Ok(Box::new(TextStrategy)),
            StrategyKind::Ast => {
                let command = self.command.as_ref().ok_or_else(|| {
                    ConfigError::Validation(
                        "extractor.strategy = \"ast\" requires extractor.command".to_string(),
                    )
                })?;
                Ok(Box::new(
                    AstToolStrategy::new(command).args(self.args.iter().cloned()),
                ))
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(dart_abstract::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(
        code(dart_abstract::config::parse),
        help("run `dart-abstract init --force` to regenerate a valid template")
    )]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Well-formed config with unusable values.
    #[error("Invalid config: {0}")]
    #[diagnostic(code(dart_abstract::config::invalid))]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.naming.interface_prefix, "I");
        assert_eq!(config.naming.implementation_suffix, "Impl");
        assert_eq!(config.extractor.strategy, StrategyKind::Text);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[naming]
interface_prefix = "Base"
implementation_suffix = "Service"

[extractor]
strategy = "ast"
command = "dart"
args = ["run", "tool/ast_parser.dart"]
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.naming.interface_name("Auth"), "BaseAuth");
        assert_eq!(config.naming.implementation_name("Auth"), "AuthService");
        assert_eq!(config.extractor.strategy, StrategyKind::Ast);
        assert_eq!(config.extractor.args.len(), 2);
        let strategy = config.extractor.build().expect("strategy builds");
        assert_eq!(strategy.name(), "ast");
    }

    #[test]
    fn test_partial_naming_keeps_defaults() {
        let config = Config::parse("[naming]\ninterface_prefix = \"Abstract\"\n")
            .expect("Failed to parse");
        assert_eq!(config.naming.implementation_suffix, "Impl");
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::parse("").expect("Failed to parse"), Config::default());
    }

    #[test]
    fn test_validation_errors() {
        for toml in [
            "[naming]\ninterface_prefix = \"\"\nimplementation_suffix = \"\"\n",
            "[naming]\ninterface_prefix = \"I-\"\n",
            "[naming]\ninterface_prefix = \"1X\"\n",
            "[extractor]\nstrategy = \"ast\"\n",
        ] {
            assert!(
                matches!(Config::parse(toml), Err(ConfigError::Validation(_))),
                "expected validation error for {toml:?}"
            );
        }
    }

    #[test]
    fn test_unknown_strategy_is_parse_error() {
        let err = Config::parse("[extractor]\nstrategy = \"regex\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_errors_carry_diagnostic_codes() {
        use miette::Diagnostic;

        let parse = Config::parse("[naming").unwrap_err();
        assert_eq!(
            parse.code().map(|c| c.to_string()).as_deref(),
            Some("dart_abstract::config::parse")
        );
        assert!(parse.help().is_some());

        let invalid = Config::parse("[naming]\ninterface_prefix = \"I-\"\n").unwrap_err();
        assert_eq!(
            invalid.code().map(|c| c.to_string()).as_deref(),
            Some("dart_abstract::config::invalid")
        );

        let io = Config::from_file(Path::new("/nonexistent/dart-abstract.toml")).unwrap_err();
        assert_eq!(
            io.code().map(|c| c.to_string()).as_deref(),
            Some("dart_abstract::config::io")
        );
    }

    #[test]
    fn test_empty_prefix_alone_is_allowed() {
        let naming = Naming::new("", "Impl");
        assert!(naming.validate().is_ok());
        assert_eq!(naming.interface_name("A"), "A");
    }
}
