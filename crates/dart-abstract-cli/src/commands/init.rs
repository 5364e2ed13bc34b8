//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# dart-abstract configuration

[naming]
# Interface name = prefix + class name (IUserRepository)
interface_prefix = "I"
# Implementation name = class name + suffix (UserRepositoryImpl)
implementation_suffix = "Impl"

[extractor]
# "text" uses the built-in scanner; "ast" runs an external Dart AST helper
strategy = "text"

# Helper for the "ast" strategy. It receives the path of a temporary .dart
# file as its last argument and prints the classes it found as JSON.
# command = "dart"
# args = ["run", "tool/ast_parser.dart"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("dart-abstract.toml"), force)?;

    println!("Created dart-abstract.toml");
    println!("\nNext steps:");
    println!("  1. Edit dart-abstract.toml to choose class names");
    println!("  2. Run: dart-abstract convert lib/my_class.dart --action insert");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
