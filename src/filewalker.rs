use crate::patterns::IgnoreMatcher;
use anyhow::{Context, Result, bail};
use ignore::{DirEntry, WalkBuilder};
use log::warn;
use std::path::{Path, PathBuf};

/// Enumerates candidate files under a root directory.
///
/// The walk is lazy and can be restarted by calling [`FileCollector::files`]
/// again. Only the supplied ignore patterns filter entries; hidden files and
/// the walker's own gitignore handling are left off.
pub struct FileCollector {
    root: PathBuf,
    recursive: bool,
    matcher: IgnoreMatcher,
}

impl FileCollector {
    pub fn new(
        root: impl Into<PathBuf>,
        recursive: bool,
        patterns: Option<&[String]>,
    ) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            bail!("Cannot scan {}: not a directory", root.display());
        }
        std::fs::read_dir(&root)
            .with_context(|| format!("Cannot list directory: {}", root.display()))?;

        let matcher = patterns.map(IgnoreMatcher::new).unwrap_or_default();

        Ok(Self {
            root,
            recursive,
            matcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Yields every regular file under the root that no pattern excludes.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        if !self.recursive {
            builder.max_depth(Some(1));
        }

        builder.build().filter_map(move |result| match result {
            Ok(entry) => self.accept(entry),
            Err(err) => {
                warn!("Error walking path: {err}");
                None
            }
        })
    }

    /// True when `path` is excluded by the ignore patterns.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let rel_path = path.strip_prefix(&self.root).unwrap_or(path);
        self.matcher.is_ignored(rel_path)
    }

    fn accept(&self, entry: DirEntry) -> Option<PathBuf> {
        if entry.depth() == 0 {
            return None;
        }

        let path = entry.into_path();
        if path.is_file() && !self.is_ignored(&path) {
            Some(path)
        } else {
            None
        }
    }
}

/// Collects all candidate files under `root` into a vector.
pub fn collect_files(
    root: &Path,
    recursive: bool,
    patterns: Option<&[String]>,
) -> Result<Vec<PathBuf>> {
    let collector = FileCollector::new(root, recursive, patterns)?;
    Ok(collector.files().collect())
}
