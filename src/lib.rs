//! # code2md Library
//!
//! Combines the files of a directory into a single Markdown document: a
//! metadata block, a table of contents, then one fenced code block per file
//! tagged with the file's language.
//!
//! Files can be filtered with the patterns of the directory's `.gitignore`
//! and picked one by one through a [`Selector`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use code2md::{AcceptAll, Config, run_code2md};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::new("src", "combined_files.md");
//!     config.recursive = true;
//!
//!     let summary = run_code2md(&config, &mut AcceptAll).await?;
//!     println!("{} of {} files combined", summary.combined, summary.considered);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod filewalker;
pub mod patterns;
pub mod selector;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use filewalker::{FileCollector, collect_files};
pub use patterns::{IgnoreMatcher, load_ignore_patterns};
pub use selector::{AcceptAll, Decision, Prompt, Selector};
pub use writer::{EntryOutcome, MarkdownWriter};

use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::BufWriter;
use utils::display_path;

/// Counts reported by a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    /// Candidates offered to the selector.
    pub considered: usize,
    /// Candidates the selector accepted.
    pub selected: usize,
    /// Sections actually written to the output.
    pub combined: usize,
}

/// Generate the combined Markdown document described by `config`.
///
/// Every candidate is put to `selector` before the output file is created.
/// Files that cannot be read are skipped; failing to enumerate the directory
/// or to write the output aborts the run.
pub async fn run_code2md<S>(config: &Config, selector: &mut S) -> Result<Summary>
where
    S: Selector + ?Sized,
{
    let patterns = if config.ignore_gitignore {
        None
    } else {
        Some(load_ignore_patterns(&config.directory)?)
    };

    let collector = FileCollector::new(&config.directory, config.recursive, patterns.as_deref())?;

    let output = resolve(&config.output_path);
    let own_file = config.self_path.as_deref().map(resolve);

    let candidates: Vec<PathBuf> = collector
        .files()
        .filter(|path| {
            let path = resolve(path);
            path != output && Some(&path) != own_file.as_ref()
        })
        .collect();

    let mut selected = Vec::new();
    for path in candidates.iter() {
        let label = display_path(path, collector.root());
        if selector.decide(Path::new(&label))? == Decision::Accept {
            selected.push((path, label));
        }
    }

    let file = File::create(&config.output_path)
        .await
        .with_context(|| format!("Failed to create output file: {}", config.output_path.display()))?;
    let mut md_writer = MarkdownWriter::new(BufWriter::new(file));

    md_writer.write_metadata(Local::now().naive_local()).await?;

    let labels: Vec<String> = selected.iter().map(|(_, label)| label.clone()).collect();
    md_writer.write_toc(&labels).await?;

    let mut combined = 0;
    for (path, label) in &selected {
        if md_writer.write_entry(path, label).await? == EntryOutcome::Written {
            combined += 1;
        }
    }

    md_writer.flush().await?;

    info!(
        "Successfully combined {} out of {} files into {}",
        combined,
        candidates.len(),
        config.output_path.display()
    );

    Ok(Summary {
        considered: candidates.len(),
        selected: selected.len(),
        combined,
    })
}

/// Canonical form of `path`, also for a file that does not exist yet.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn resolve_handles_missing_files() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("out.md");
        assert_eq!(resolve(&missing), dir.path().canonicalize()?.join("out.md"));

        std::fs::write(&missing, "")?;
        assert_eq!(resolve(&missing), missing.canonicalize()?);
        Ok(())
    }
}
