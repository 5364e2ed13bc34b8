//! List command implementation.

use anyhow::Result;
use dart_abstract_core::TextStrategy;
use std::path::{Path, PathBuf};

/// True when the conversion should be offered for `text`.
///
/// Any `class ` counts, including one inside a comment or a string.
#[must_use]
pub fn offers_conversion(text: &str) -> bool {
    text.contains("class ")
}

/// A Dart file that offers conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path relative to the search root.
    pub path: PathBuf,
    /// First class the text scanner finds, if any.
    pub class_name: Option<String>,
}

/// Walks `root` (respecting `.gitignore`) and collects convertible files,
/// sorted by path.
pub fn find_candidates(root: &Path) -> Result<Vec<Candidate>> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder.hidden(false).git_ignore(true);

    let mut candidates = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("dart") {
            continue;
        }

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", path.display());
                continue;
            }
        };
        if !offers_conversion(&text) {
            continue;
        }

        candidates.push(Candidate {
            path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            class_name: TextStrategy::extract_shape(&text).map(|s| s.header.name),
        });
    }

    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(candidates)
}

/// Runs the list command.
pub fn run(root: &Path) -> Result<()> {
    let candidates = find_candidates(root)?;

    for c in &candidates {
        match &c.class_name {
            Some(name) => println!("{:<50} {name}", c.path.display()),
            None => println!("{:<50} (no class found)", c.path.display()),
        }
    }

    tracing::info!("{} file(s) offer conversion", candidates.len());
    Ok(())
}
