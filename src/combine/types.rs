use std::fmt;

/// Decision for a single walked entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Do not descend into this directory
    SkipSubtree(SkipReason),
    /// Ignore this file and keep walking
    SkipEntry(SkipReason),
    /// Directory survived the filters; keep walking into it
    Descend,
    /// File goes into the combined output
    Include,
}

/// Which filter rejected an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Gitignore,
    ExcludedDirectory,
    Extension,
    /// The combined document itself, when written inside the scan root
    OutputFile,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::Gitignore => "matched .gitignore",
            SkipReason::ExcludedDirectory => "excluded directory",
            SkipReason::Extension => "extension not included",
            SkipReason::OutputFile => "output file",
        };
        f.write_str(reason)
    }
}

/// Statistics from a combine run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CombineStats {
    pub files_written: usize,
    pub lines_written: usize,
    pub bytes_read: u64,
    pub directories_pruned: usize,
    pub files_ignored: usize,
    pub files_skipped_by_extension: usize,
}

impl CombineStats {
    /// Count a filter decision
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::SkipSubtree(_) => self.directories_pruned += 1,
            Verdict::SkipEntry(SkipReason::Extension) => self.files_skipped_by_extension += 1,
            Verdict::SkipEntry(_) => self.files_ignored += 1,
            Verdict::Descend | Verdict::Include => {}
        }
    }
}
