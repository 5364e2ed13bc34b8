//! dart-abstract CLI tool.
//!
//! Usage:
//! ```bash
//! dart-abstract convert [OPTIONS] [FILE]
//! dart-abstract list [PATH]
//! dart-abstract init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod edit;

use edit::{Action, LineRange};

/// Split a Dart class into an abstract interface and an implementation
#[derive(Parser)]
#[command(name = "dart-abstract")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an interface and implementation from the first class in a file
    Convert {
        /// Dart file to read (default: stdin)
        file: Option<PathBuf>,

        /// Interface name prefix (overrides config)
        #[arg(long)]
        prefix: Option<String>,

        /// Implementation name suffix (overrides config)
        #[arg(long)]
        suffix: Option<String>,

        /// What to do with the generated code
        #[arg(short, long, default_value = "copy")]
        action: Action,

        /// Only convert these lines, e.g. `12:40` (1-based, inclusive)
        #[arg(short, long)]
        lines: Option<LineRange>,

        /// Extraction strategy (overrides config)
        #[arg(long)]
        strategy: Option<StrategyArg>,

        /// AST helper program for `--strategy ast` (overrides config)
        #[arg(long)]
        extractor: Option<PathBuf>,

        /// Print the edited document instead of writing the file back
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List Dart files that contain a class to convert
    List {
        /// Directory to search (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for generated code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Dart source text.
    #[default]
    Text,
    /// `{ "interfaceText": ..., "concreteText": ... }`
    Json,
}

/// Extraction strategy selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyArg {
    /// Built-in text scanner
    Text,
    /// External Dart AST helper
    Ast,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Generated code goes to stdout, so logs must not.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            file,
            prefix,
            suffix,
            action,
            lines,
            strategy,
            extractor,
            dry_run,
            format,
        } => {
            let source = config_resolver::resolve(file.as_deref(), cli.config.as_deref());
            commands::convert::run(&commands::convert::ConvertArgs {
                file,
                overrides: commands::convert::Overrides {
                    prefix,
                    suffix,
                    strategy,
                    extractor,
                },
                action,
                lines,
                dry_run,
                format,
                source,
            })
        }
        Commands::List { path } => commands::list::run(&path),
        Commands::Init { force } => commands::init::run(force),
    }
}
