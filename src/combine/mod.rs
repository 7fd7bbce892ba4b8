//! Walk, filter and write: the combine pipeline
//!
//! ```text
//! .gitignore ──▶ IgnoreRules ─┐
//! extensions ─────────────────┼──▶ PathFilter ──▶ TreeWalker ──▶ CombinedWriter ──▶ output
//! excluded dirs ──────────────┘
//! ```
//!
//! Everything runs on the calling thread. The first I/O error aborts the run
//! and whatever was already written to the output stays there.

pub mod filter;
pub mod gitignore;
pub mod types;
pub mod walker;
pub mod writer;

pub use filter::{PathFilter, file_extension};
pub use gitignore::IgnoreRules;
pub use types::{CombineStats, SkipReason, Verdict};
pub use walker::{IncludedFile, TreeWalker, Written};
pub use writer::CombinedWriter;

use crate::config::CombineConfig;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Runs one combine over a resolved configuration
pub struct Combiner<'a> {
    config: &'a CombineConfig,
    filter: PathFilter,
    ignore_error: Option<anyhow::Error>,
}

impl<'a> Combiner<'a> {
    pub fn new(config: &'a CombineConfig, ignore_rules: IgnoreRules) -> Self {
        let filter = PathFilter::new(
            config.extensions.iter().cloned(),
            config.excluded_dirs.iter().cloned(),
            ignore_rules,
        );
        Self {
            config,
            filter,
            ignore_error: None,
        }
    }

    /// Build a combiner, loading `<root>/.gitignore` when present
    ///
    /// A `.gitignore` that cannot be loaded is logged and kept in
    /// [`Combiner::ignore_error`]; the run goes on without gitignore filtering.
    pub fn from_config(config: &'a CombineConfig) -> Self {
        match IgnoreRules::load(&config.root) {
            Ok(rules) => Self::new(config, rules),
            Err(e) => {
                tracing::warn!("Error loading .gitignore: {:#}", e);
                let mut combiner = Self::new(config, IgnoreRules::none());
                combiner.ignore_error = Some(e);
                combiner
            }
        }
    }

    /// Why `.gitignore` filtering is off for this run, if it failed to load
    pub fn ignore_error(&self) -> Option<&anyhow::Error> {
        self.ignore_error.as_ref()
    }

    fn walker(&self) -> TreeWalker<'_> {
        let walker = TreeWalker::new(&self.config.root, &self.filter);
        match output_within_root(&self.config.output, &self.config.root) {
            Some(relative) => walker.skip_file(relative),
            None => walker,
        }
    }

    /// List the files a real run would write, in output order
    pub fn plan(&self) -> Result<(Vec<PathBuf>, CombineStats)> {
        let mut files = Vec::new();
        let stats = self
            .walker()
            .walk(|file| {
                files.push(file.relative.to_path_buf());
                Ok(Written::default())
            })
            .with_context(|| format!("Error walking the path {}", self.config.root.display()))?;
        Ok((files, stats))
    }

    /// Stream every included file into `out`
    pub fn write_to<W: Write>(&self, out: W) -> Result<CombineStats> {
        let mut writer = CombinedWriter::new(out);

        let stats = self
            .walker()
            .walk(|file| {
                let content = fs::read(file.path)
                    .with_context(|| format!("Failed to read {}", file.relative.display()))?;
                let lines = writer
                    .write_file(file.relative, &content)
                    .with_context(|| format!("Failed to write {} to output", file.relative.display()))?;
                Ok(Written {
                    lines,
                    bytes: content.len() as u64,
                })
            })
            .with_context(|| format!("Error walking the path {}", self.config.root.display()))?;

        writer.flush().context("Failed to flush output")?;
        Ok(stats)
    }
}

/// Create (or truncate) the output document
pub fn create_output(config: &CombineConfig) -> Result<BufWriter<File>> {
    let file = File::create(&config.output).with_context(|| {
        format!("Error creating output file {}", config.output.display())
    })?;
    Ok(BufWriter::new(file))
}

/// Create the output file, then load `.gitignore` and write the combined document
pub fn combine(config: &CombineConfig) -> Result<CombineStats> {
    let out = create_output(config)?;
    let combiner = Combiner::from_config(config);
    let stats = combiner.write_to(out)?;
    log_summary(config, &stats);
    Ok(stats)
}

/// Log the outcome of a finished run
pub fn log_summary(config: &CombineConfig, stats: &CombineStats) {
    tracing::info!(
        "Wrote {} files ({} lines, {} bytes) to {}",
        stats.files_written,
        stats.lines_written,
        stats.bytes_read,
        config.output.display()
    );
}

/// Output path relative to the scan root, if the output lives inside it
fn output_within_root(output: &Path, root: &Path) -> Option<PathBuf> {
    let output = fs::canonicalize(output).ok()?;
    let root = fs::canonicalize(root).ok()?;
    output.strip_prefix(&root).ok().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn config(root: &Path, output: PathBuf, extensions: &[&str], excluded: &[&str]) -> CombineConfig {
        CombineConfig {
            root: root.to_path_buf(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
            excluded_dirs: excluded.iter().map(|s| s.to_string()).collect(),
            output,
        }
    }

    #[test]
    fn test_vendor_scenario() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(src.path(), "a.go", "x\n");
        touch(src.path(), "b.txt", "text");
        touch(src.path(), "vendor/c.go", "package c");
        let output = out.path().join("combined_code.md");

        let stats = combine(&config(src.path(), output.clone(), &["go"], &["vendor"])).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "===== FILE START: a.go =====\n   1 | x\n   2 | \n===== FILE END: a.go =====\n\n"
        );
        assert_eq!(stats.files_written, 1);
        assert_eq!(stats.lines_written, 2);
        assert_eq!(stats.bytes_read, 2);
    }

    #[test]
    fn test_gitignore_excludes_included_extension() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(src.path(), ".gitignore", "*.log\n");
        touch(src.path(), "debug.log", "noise");
        touch(src.path(), "app.log.go", "package app");
        let output = out.path().join("out.md");

        combine(&config(src.path(), output.clone(), &["log", "go"], &[])).unwrap();

        let combined = fs::read_to_string(&output).unwrap();
        assert!(!combined.contains("debug.log"));
        assert!(combined.contains("FILE START: app.log.go"));
    }

    #[test]
    fn test_unreadable_gitignore_falls_back_to_no_rules() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        // Would ignore kept.go if it were honored
        fs::write(src.path().join(".gitignore"), b"*.go\n\xff\xfe\n").unwrap();
        touch(src.path(), "kept.go", "package kept");
        let output = out.path().join("out.md");
        let cfg = config(src.path(), output.clone(), &["go"], &[]);

        let combiner = Combiner::from_config(&cfg);
        assert!(combiner.ignore_error().is_some());

        let stats = combine(&cfg).unwrap();
        assert_eq!(stats.files_written, 1);
        assert!(fs::read_to_string(&output).unwrap().contains("FILE START: kept.go"));
    }

    #[test]
    fn test_gitignore_directory_falls_back_to_no_rules() {
        let src = TempDir::new().unwrap();
        fs::create_dir(src.path().join(".gitignore")).unwrap();
        touch(src.path(), "kept.go", "package kept");
        let cfg = config(src.path(), src.path().join("unused.md"), &["go"], &[]);

        let combiner = Combiner::from_config(&cfg);
        assert!(combiner.ignore_error().is_some());

        let (files, _) = combiner.plan().unwrap();
        assert_eq!(files, vec![PathBuf::from("kept.go")]);
    }

    #[test]
    fn test_loadable_gitignore_reports_no_error() {
        let src = TempDir::new().unwrap();
        touch(src.path(), ".gitignore", "*.log\n");
        let cfg = config(src.path(), src.path().join("unused.md"), &["go"], &[]);

        assert!(Combiner::from_config(&cfg).ignore_error().is_none());
    }

    #[test]
    fn test_nested_gitignore_is_not_honored() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(src.path(), "sub/.gitignore", "*.go\n");
        touch(src.path(), "sub/x.go", "package sub");
        let output = out.path().join("out.md");

        let stats = combine(&config(src.path(), output.clone(), &["go"], &[])).unwrap();

        assert_eq!(stats.files_written, 1);
        assert!(fs::read_to_string(&output).unwrap().contains("FILE START: sub"));
        assert_eq!(stats.files_ignored, 0);
    }

    #[test]
    fn test_output_inside_root_is_not_read_back() {
        let src = TempDir::new().unwrap();
        touch(src.path(), "README.md", "# hi");
        let output = src.path().join("combined_code.md");
        fs::write(&output, "stale").unwrap();

        let stats = combine(&config(src.path(), output.clone(), &["md"], &[])).unwrap();

        let combined = fs::read_to_string(&output).unwrap();
        assert_eq!(stats.files_written, 1);
        assert!(combined.contains("FILE START: README.md"));
        assert!(!combined.contains("FILE START: combined_code.md"));
        assert!(!combined.contains("stale"));
    }

    #[test]
    fn test_output_creation_failure() {
        let src = TempDir::new().unwrap();
        let output = src.path().join("missing-dir").join("out.md");

        let err = combine(&config(src.path(), output, &["go"], &[])).unwrap_err();
        assert!(err.to_string().starts_with("Error creating output file"));
    }

    #[test]
    fn test_plan_lists_files_without_writing() {
        let src = TempDir::new().unwrap();
        touch(src.path(), "b.go", "");
        touch(src.path(), "a.go", "");
        touch(src.path(), "skip/c.go", "");
        let output = src.path().join("never.md");
        let cfg = config(src.path(), output.clone(), &["go"], &["skip"]);

        let (files, stats) = Combiner::new(&cfg, IgnoreRules::none()).plan().unwrap();

        assert_eq!(files, vec![PathBuf::from("a.go"), PathBuf::from("b.go")]);
        assert_eq!(stats.directories_pruned, 1);
        assert!(!output.exists());
    }

    #[test]
    fn test_write_to_round_trips_each_file() {
        let src = TempDir::new().unwrap();
        let original = "fn main() {\n    println!(\"hi\");\n}\n";
        touch(src.path(), "main.rs", original);
        let cfg = config(src.path(), src.path().join("unused.md"), &["rs"], &[]);

        let mut buffer = Vec::new();
        Combiner::new(&cfg, IgnoreRules::none())
            .write_to(&mut buffer)
            .unwrap();
        let combined = String::from_utf8(buffer).unwrap();

        let body: Vec<&str> = combined
            .lines()
            .filter(|line| line.get(4..7) == Some(" | "))
            .map(|line| &line[7..])
            .collect();
        assert_eq!(body.join("\n"), original);
    }
}
