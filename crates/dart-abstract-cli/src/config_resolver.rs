//! Finding the configuration that applies to a Dart file.
//!
//! An editor runs the tool with a file somewhere inside a Dart package, and
//! the working directory is not necessarily that package. So the search
//! starts at the file's own directory:
//!
//! 1. `--config` flag, taken as is
//! 2. the nearest `dart-abstract.toml` or `.dart-abstract.toml` walking up
//!    from the file, up to and including the package root (the first
//!    directory holding `pubspec.yaml`)
//! 3. `config.toml` in `$DART_ABSTRACT_CONFIG_DIR` or `~/.dart-abstract/`
//! 4. built-in defaults
//!
//! Input read from stdin starts the search in the working directory.

use anyhow::{Context, Result};
use dart_abstract_core::Config;
use std::path::{Path, PathBuf};

/// Config file names looked for in each directory, in order.
const CONFIG_NAMES: &[&str] = &["dart-abstract.toml", ".dart-abstract.toml"];

/// Marks the root of a Dart package; the upward search ends there.
const PACKAGE_MARKER: &str = "pubspec.yaml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the file or in one of its parents inside the package.
    Package(PathBuf),
    /// The user-wide file.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Reads the config this source points at, or the defaults.
    pub fn load(&self) -> Result<Config> {
        let path = match self {
            Self::Default => return Ok(Config::default()),
            Self::Global(p) => {
                tracing::info!("Using global config: {}", p.display());
                p
            }
            Self::Explicit(p) | Self::Package(p) => p,
        };
        Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Resolves the config for `input` (`None` for stdin).
#[must_use]
pub fn resolve(input: Option<&Path>, explicit: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }
    let start = match input.and_then(Path::parent) {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let start = std::fs::canonicalize(&start).unwrap_or(start);
    resolve_from(&start, global_config_dir())
}

fn resolve_from(start: &Path, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(found) = find_in_package(start) {
        tracing::debug!("Found package config: {}", found.display());
        return ConfigSource::Package(found);
    }

    global_dir
        .map(|dir| dir.join("config.toml"))
        .filter(|p| p.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

fn find_in_package(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        if let Some(found) = CONFIG_NAMES.iter().map(|n| dir.join(n)).find(|p| p.is_file()) {
            return Some(found);
        }
        if dir.join(PACKAGE_MARKER).is_file() {
            tracing::debug!("No config up to package root {}", dir.display());
            return None;
        }
    }
    None
}

/// `$DART_ABSTRACT_CONFIG_DIR`, else `~/.dart-abstract/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os("DART_ABSTRACT_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".dart-abstract")))
}
