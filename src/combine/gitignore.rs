//! Root-level `.gitignore` loading
//!
//! Only the `.gitignore` sitting directly in the scan root is honored.
//! Nested ignore files, `.git/info/exclude` and the global excludes file are
//! not consulted.

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

pub const GITIGNORE_FILE: &str = ".gitignore";

// Queries are already relative to the scan root, so the matcher is rooted at
// "." and never strips a prefix off the candidate path.
const MATCH_ROOT: &str = ".";

/// Compiled ignore patterns for one scan root, or nothing at all
///
/// An empty set of rules never matches, so callers query it unconditionally
/// instead of branching on whether a `.gitignore` was found.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    matcher: Option<Gitignore>,
}

impl IgnoreRules {
    /// Rules that ignore nothing
    pub fn none() -> Self {
        Self { matcher: None }
    }

    /// Compile `<root>/.gitignore`
    ///
    /// A missing file yields empty rules. A file that cannot be read, or that
    /// holds a pattern which fails to compile, is an error; the caller decides
    /// whether to carry on without it.
    pub fn load(root: &Path) -> Result<Self> {
        let gitignore_path = root.join(GITIGNORE_FILE);
        if !gitignore_path.exists() {
            tracing::debug!("No {} in {}", GITIGNORE_FILE, root.display());
            return Ok(Self::none());
        }

        let mut builder = GitignoreBuilder::new(MATCH_ROOT);
        if let Some(err) = builder.add(&gitignore_path) {
            return Err(err)
                .with_context(|| format!("Failed to parse {}", gitignore_path.display()));
        }
        let matcher = builder
            .build()
            .with_context(|| format!("Failed to compile {}", gitignore_path.display()))?;

        tracing::debug!(
            "Loaded {} ignore patterns from {}",
            matcher.num_ignores(),
            gitignore_path.display()
        );
        Ok(Self {
            matcher: Some(matcher),
        })
    }

    /// Compile rules from in-memory `.gitignore` lines
    #[cfg(test)]
    pub(crate) fn from_lines<'a, I>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = GitignoreBuilder::new(MATCH_ROOT);
        for line in lines {
            builder
                .add_line(None, line)
                .with_context(|| format!("Invalid ignore pattern '{}'", line))?;
        }
        let matcher = builder.build().context("Failed to compile ignore patterns")?;
        Ok(Self {
            matcher: Some(matcher),
        })
    }

    /// Whether any `.gitignore` rules are in effect
    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.matcher.as_ref().is_some_and(|m| !m.is_empty())
    }

    /// Does `relative` (or one of its parent directories) match an ignore pattern?
    ///
    /// Whitelist patterns (`!pattern`) count as a non-match.
    pub fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        match &self.matcher {
            Some(matcher) => matcher
                .matched_path_or_any_parents(relative, is_dir)
                .is_ignore(),
            None => false,
        }
    }
}
