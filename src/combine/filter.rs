use super::gitignore::IgnoreRules;
use super::types::{SkipReason, Verdict};
use std::collections::HashSet;
use std::path::{MAIN_SEPARATOR, Path};

/// Relative path of the scan root itself
pub const ROOT: &str = ".";

/// Path Filter - decides what happens to every entry the walker visits
///
/// Rules are applied in a fixed order and the first one that fires wins:
/// 1. `.gitignore` match prunes directories and skips files
/// 2. Directories equal to, or nested under, an excluded directory are pruned
/// 3. Files whose extension is not in the include set are skipped
///
/// The filter is pure: it only looks at the relative path and the
/// directory flag, never at the filesystem.
#[derive(Debug, Clone)]
pub struct PathFilter {
    extensions: HashSet<String>,
    excluded_dirs: Vec<String>,
    ignore_rules: IgnoreRules,
}

impl PathFilter {
    pub fn new(
        extensions: impl IntoIterator<Item = String>,
        excluded_dirs: impl IntoIterator<Item = String>,
        ignore_rules: IgnoreRules,
    ) -> Self {
        Self {
            extensions: extensions.into_iter().collect(),
            excluded_dirs: excluded_dirs.into_iter().collect(),
            ignore_rules,
        }
    }

    /// Classify an entry by its path relative to the scan root
    pub fn decide(&self, relative: &Path, is_dir: bool) -> Verdict {
        if self.ignore_rules.is_ignored(relative, is_dir) {
            return if is_dir {
                Verdict::SkipSubtree(SkipReason::Gitignore)
            } else {
                Verdict::SkipEntry(SkipReason::Gitignore)
            };
        }

        if is_dir {
            if relative != Path::new(ROOT) && self.is_excluded_dir(relative) {
                return Verdict::SkipSubtree(SkipReason::ExcludedDirectory);
            }
            return Verdict::Descend;
        }

        if self.extensions.contains(file_extension(relative)) {
            Verdict::Include
        } else {
            Verdict::SkipEntry(SkipReason::Extension)
        }
    }

    /// Is `relative` one of the excluded directories or nested under one?
    pub fn is_excluded_dir(&self, relative: &Path) -> bool {
        let path = relative.to_string_lossy();
        self.excluded_dirs.iter().any(|dir| {
            path == dir.as_str()
                || path
                    .strip_prefix(dir.as_str())
                    .is_some_and(|rest| rest.starts_with(MAIN_SEPARATOR))
        })
    }
}

/// Substring after the last `.` of the file name, or `""` when there is none
///
/// Case is preserved and dotfiles count as all-extension, so `.bashrc`
/// yields `bashrc`.
pub fn file_extension(path: &Path) -> &str {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return "",
    };
    match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => "",
    }
}
