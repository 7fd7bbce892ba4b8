use super::filter::{PathFilter, ROOT};
use super::types::{CombineStats, SkipReason, Verdict};
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file that passed every filter
#[derive(Debug, Clone, Copy)]
pub struct IncludedFile<'a> {
    /// Path as seen by the filesystem (root joined with `relative`)
    pub path: &'a Path,
    /// Path relative to the scan root
    pub relative: &'a Path,
}

/// What the consumer did with an included file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Written {
    pub lines: usize,
    pub bytes: u64,
}

/// Pre-order, depth-first walk over a scan root
///
/// Entries inside a directory are visited in file name order. Symlinks are
/// not followed while walking. The first I/O error stops the walk and is
/// returned with the offending path attached.
pub struct TreeWalker<'a> {
    root: &'a Path,
    filter: &'a PathFilter,
    skip_file: Option<PathBuf>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(root: &'a Path, filter: &'a PathFilter) -> Self {
        Self {
            root,
            filter,
            skip_file: None,
        }
    }

    /// Never hand this file (relative to the root) to the consumer
    ///
    /// Used for the output document when it lives inside the scan root.
    pub fn skip_file(mut self, relative: impl Into<PathBuf>) -> Self {
        self.skip_file = Some(relative.into());
        self
    }

    /// Walk the tree, calling `on_include` for every included file in order
    pub fn walk<F>(&self, mut on_include: F) -> Result<CombineStats>
    where
        F: FnMut(IncludedFile<'_>) -> Result<Written>,
    {
        let metadata = std::fs::metadata(self.root)
            .with_context(|| format!("Cannot access {}", self.root.display()))?;
        if !metadata.is_dir() {
            bail!("{} is not a directory", self.root.display());
        }

        let mut stats = CombineStats::default();
        let mut entries = WalkDir::new(self.root).sort_by_file_name().into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| self.root.display().to_string());
                anyhow::Error::new(err).context(format!("Failed to read {}", path))
            })?;

            let relative = self.relative_path(entry.path())?;
            // A symlinked root is followed but still reports a symlink file type
            let is_dir = entry.depth() == 0 || entry.file_type().is_dir();

            let verdict = if !is_dir && self.skip_file.as_deref() == Some(relative.as_path()) {
                Verdict::SkipEntry(SkipReason::OutputFile)
            } else {
                self.filter.decide(&relative, is_dir)
            };
            stats.record(verdict);

            match verdict {
                Verdict::SkipSubtree(reason) => {
                    tracing::debug!("Pruning {}: {}", relative.display(), reason);
                    entries.skip_current_dir();
                }
                Verdict::SkipEntry(reason) => {
                    tracing::debug!("Skipping {}: {}", relative.display(), reason);
                }
                Verdict::Descend => {
                    tracing::trace!("Entering {}", relative.display());
                }
                Verdict::Include => {
                    tracing::trace!("Including {}", relative.display());
                    let written = on_include(IncludedFile {
                        path: entry.path(),
                        relative: &relative,
                    })?;
                    stats.files_written += 1;
                    stats.lines_written += written.lines;
                    stats.bytes_read += written.bytes;
                }
            }
        }

        Ok(stats)
    }

    fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        let relative = path.strip_prefix(self.root).with_context(|| {
            format!(
                "{} is not under {}",
                path.display(),
                self.root.display()
            )
        })?;
        if relative.as_os_str().is_empty() {
            Ok(PathBuf::from(ROOT))
        } else {
            Ok(relative.to_path_buf())
        }
    }
}
