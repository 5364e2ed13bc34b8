//! Convert command implementation.

use anyhow::{anyhow, bail, Context, Result};
use dart_abstract_core::{Config, ConversionResult, Converter, StrategyKind};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::edit::{self, Action, LineRange, Materialized};
use crate::{OutputFormat, StrategyArg};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// `--prefix`
    pub prefix: Option<String>,
    /// `--suffix`
    pub suffix: Option<String>,
    /// `--strategy`
    pub strategy: Option<StrategyArg>,
    /// `--extractor`; implies the `ast` strategy unless `--strategy` says otherwise.
    pub extractor: Option<PathBuf>,
}

impl Overrides {
    fn apply(&self, config: &mut Config) {
        if let Some(prefix) = &self.prefix {
            config.naming.interface_prefix.clone_from(prefix);
        }
        if let Some(suffix) = &self.suffix {
            config.naming.implementation_suffix.clone_from(suffix);
        }
        if let Some(program) = &self.extractor {
            config.extractor.command = Some(program.clone());
            config.extractor.strategy = StrategyKind::Ast;
        }
        match self.strategy {
            Some(StrategyArg::Text) => config.extractor.strategy = StrategyKind::Text,
            Some(StrategyArg::Ast) => config.extractor.strategy = StrategyKind::Ast,
            None => {}
        }
    }
}

/// Everything the convert command needs.
#[derive(Debug)]
pub struct ConvertArgs {
    /// Input file, or stdin when `None`.
    pub file: Option<PathBuf>,
    /// Flag overrides.
    pub overrides: Overrides,
    /// Materialization action.
    pub action: Action,
    /// Optional selection.
    pub lines: Option<LineRange>,
    /// Print instead of writing back.
    pub dry_run: bool,
    /// Output format.
    pub format: OutputFormat,
    /// Resolved config location.
    pub source: ConfigSource,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    strategy: &'a str,
    #[serde(flatten)]
    result: &'a ConversionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<&'a str>,
}

/// Runs the convert command.
pub fn run(args: &ConvertArgs) -> Result<()> {
    if let Some(path) = &args.file {
        ensure_dart_file(path)?;
    }
    let document = read_document(args.file.as_deref())?;

    let mut config = args.source.load()?;
    args.overrides.apply(&mut config);
    config.validate().context("Invalid settings")?;
    let converter = Converter::from_config(&config).context("Failed to set up extraction")?;

    let selection = match args.lines {
        Some(lines) => Some(lines.byte_range(&document).with_context(|| {
            format!("Line {} is past the end of the input", lines.start)
        })?),
        None => None,
    };
    let text = selection
        .clone()
        .map_or(document.as_str(), |r| &document[r]);

    tracing::debug!(
        strategy = converter.strategy_name(),
        bytes = text.len(),
        "converting"
    );

    let Some(result) = converter
        .convert(text)
        .map_err(|e| anyhow!("{:?}", miette::Report::new(e)))?
    else {
        bail!("No valid Dart class found!");
    };

    let output = result.joined();
    match edit::apply(args.action, &document, selection, &output) {
        Materialized::Clipboard(code) => {
            print(args.format, &code, &report(&converter, &result, None))?;
            tracing::info!("Code ready to copy");
        }
        Materialized::Document(edited) => match (&args.file, args.dry_run) {
            (Some(path), false) => {
                std::fs::write(path, &edited)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if args.format == OutputFormat::Json {
                    print(args.format, "", &report(&converter, &result, None))?;
                }
                tracing::info!("Interface and implementation created successfully!");
            }
            _ => print(
                args.format,
                &edited,
                &report(&converter, &result, Some(&edited)),
            )?,
        },
    }

    Ok(())
}

fn report<'a>(
    converter: &Converter,
    result: &'a ConversionResult,
    document: Option<&'a str>,
) -> Report<'a> {
    Report {
        strategy: converter.strategy_name(),
        result,
        document,
    }
}

fn print(format: OutputFormat, text: &str, report: &Report<'_>) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{text}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

fn ensure_dart_file(path: &Path) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) != Some("dart") {
        bail!("This command only works with Dart files!");
    }
    Ok(())
}

fn read_document(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(file: PathBuf, action: Action) -> ConvertArgs {
        ConvertArgs {
            file: Some(file),
            overrides: Overrides::default(),
            action,
            lines: None,
            dry_run: false,
            format: OutputFormat::Text,
            source: ConfigSource::Default,
        }
    }

    #[test]
    fn rejects_non_dart_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("user.kt");
        fs::write(&path, "class User {}").unwrap();

        let err = run(&args(path, Action::Copy)).unwrap_err();
        assert_eq!(err.to_string(), "This command only works with Dart files!");
    }

    #[test]
    fn reports_missing_class() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("main.dart");
        fs::write(&path, "void main() {}\n").unwrap();

        let err = run(&args(path, Action::Copy)).unwrap_err();
        assert_eq!(err.to_string(), "No valid Dart class found!");
    }

    #[test]
    fn replace_writes_file_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("user.dart");
        fs::write(&path, "class User { String id; }").unwrap();

        run(&args(path.clone(), Action::Replace)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("abstract class IUser {\n  String get id;\n}"));
        assert!(written.contains("class UserImpl implements IUser {"));
        assert!(!written.contains("class User {"));
    }

    #[test]
    fn insert_keeps_selected_class() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("repo.dart");
        fs::write(&path, "import 'x.dart';\nclass Repo { int n; }\nvoid main() {}\n").unwrap();

        let mut a = args(path.clone(), Action::Insert);
        a.lines = Some(LineRange { start: 2, end: 2 });
        a.overrides.prefix = Some("Base".to_string());
        run(&a).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("import 'x.dart';\nclass Repo { int n; }\n\nabstract class BaseRepo {"));
        assert!(written.ends_with("RepoImpl(this.n);\n}\nvoid main() {}\n"));
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.dart");
        fs::write(&path, "class A {}").unwrap();

        let mut a = args(path.clone(), Action::Replace);
        a.dry_run = true;
        run(&a).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "class A {}");
    }

    #[test]
    fn selection_past_end_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.dart");
        fs::write(&path, "class A {}\n").unwrap();

        let mut a = args(path, Action::Copy);
        a.lines = Some(LineRange { start: 2, end: 6 });
        let err = run(&a).unwrap_err();
        assert_eq!(err.to_string(), "Line 2 is past the end of the input");
    }

    #[test]
    fn overrides_beat_config() {
        let mut config = Config::parse("[naming]\ninterface_prefix = \"Abstract\"\n").unwrap();
        Overrides {
            suffix: Some("Service".to_string()),
            extractor: Some(PathBuf::from("dart-ast")),
            ..Overrides::default()
        }
        .apply(&mut config);

        assert_eq!(config.naming.interface_prefix, "Abstract");
        assert_eq!(config.naming.implementation_suffix, "Service");
        assert_eq!(config.extractor.strategy, StrategyKind::Ast);
        assert_eq!(config.extractor.command, Some(PathBuf::from("dart-ast")));
    }

    #[test]
    fn explicit_text_strategy_wins_over_extractor() {
        let mut config = Config::default();
        Overrides {
            strategy: Some(StrategyArg::Text),
            extractor: Some(PathBuf::from("dart-ast")),
            ..Overrides::default()
        }
        .apply(&mut config);
        assert_eq!(config.extractor.strategy, StrategyKind::Text);
    }

    #[test]
    fn invalid_prefix_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.dart");
        fs::write(&path, "class A {}").unwrap();

        let mut a = args(path, Action::Copy);
        a.overrides.prefix = Some("I-".to_string());
        let err = run(&a).unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));
    }
}
