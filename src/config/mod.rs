//! Configuration management for combine-code
//!
//! Settings are merged from several layers (see [`Settings::figment`]) and
//! then resolved into an immutable [`CombineConfig`] that drives one run.

mod core;
pub mod overrides;
pub mod smart_load;


pub use self::core::{ENV_PREFIX, REPO_CONFIG_FILES};
pub use overrides::CliOverrides;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{MAIN_SEPARATOR_STR, PathBuf};

/// Output file used when nothing else is configured
pub const DEFAULT_OUTPUT: &str = "combined_code.md";

/// Raw, merged settings before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory to scan
    #[serde(default, deserialize_with = "deserialize_path")]
    pub path: Option<PathBuf>,

    /// Extensions to include, without the leading dot
    #[serde(default)]
    pub include_extensions: Option<ListSetting>,

    /// Output document path
    #[serde(default, deserialize_with = "deserialize_path")]
    pub output: Option<PathBuf>,

    /// Directories (relative to the root) to prune
    #[serde(default)]
    pub exclude_dirs: Option<ListSetting>,
}

/// A list given either as `"a,b"` or as `["a", "b"]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListSetting {
    Csv(#[serde(deserialize_with = "deserialize_text")] String),
    Items(#[serde(deserialize_with = "deserialize_texts")] Vec<String>),
}

/// Any scalar a provider may hand back for a textual setting
///
/// Environment values are parsed, so `COMBINE_CODE_EXCLUDE_DIRS=2024`
/// arrives as an integer and `COMBINE_CODE_OUTPUT=true` as a bool.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Flag(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Signed(n) => n.to_string(),
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Flag(b) => b.to_string(),
        }
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn deserialize_texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Scalar>::deserialize(deserializer)?;
    Ok(items.into_iter().map(String::from).collect())
}

fn deserialize_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let scalar = Option::<Scalar>::deserialize(deserializer)?;
    Ok(scalar.map(|s| PathBuf::from(String::from(s))))
}

impl ListSetting {
    /// The raw entries; a blank string is an empty list
    pub fn items(&self) -> Vec<String> {
        match self {
            ListSetting::Csv(raw) if raw.trim().is_empty() => Vec::new(),
            ListSetting::Csv(raw) => raw.split(',').map(str::to_string).collect(),
            ListSetting::Items(items) => items.clone(),
        }
    }
}

/// Resolved configuration for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineConfig {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub excluded_dirs: Vec<String>,
    pub output: PathBuf,
}

/// A required setting that no layer provided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSetting {
    Path,
    IncludeExtensions,
}

impl fmt::Display for MissingSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingSetting::Path => f.write_str("missing required setting --path"),
            MissingSetting::IncludeExtensions => {
                f.write_str("missing required setting --includeExtensions")
            }
        }
    }
}

impl std::error::Error for MissingSetting {}

impl Settings {
    /// Validate the merged settings into a run configuration
    pub fn resolve(self) -> Result<CombineConfig, MissingSetting> {
        let root = self
            .path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(MissingSetting::Path)?;

        let extensions = self
            .include_extensions
            .map(|list| parse_extensions(&list.items()))
            .unwrap_or_default();
        if extensions.is_empty() {
            return Err(MissingSetting::IncludeExtensions);
        }

        let excluded_dirs = self
            .exclude_dirs
            .map(|list| parse_excluded_dirs(&list.items()))
            .unwrap_or_default();

        let output = self
            .output
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        Ok(CombineConfig {
            root,
            extensions,
            excluded_dirs,
            output,
        })
    }
}

/// Trim entries and drop one leading dot (`.rs` → `rs`)
///
/// Empty entries are kept: `go,` selects files without an extension too.
pub fn parse_extensions(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let item = item.trim();
            item.strip_prefix('.').unwrap_or(item).to_string()
        })
        .collect()
}

/// Normalize excluded directories to the form relative paths take while walking
///
/// `./vendor/` becomes `vendor`; `/` is mapped to the platform separator.
/// Blank entries and `.` are dropped since the root is never pruned by them.
pub fn parse_excluded_dirs(items: &[String]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| {
            let mut dir = item.trim();
            while let Some(rest) = dir.strip_prefix("./") {
                dir = rest;
            }
            let dir = dir.trim_end_matches(['/', '\\']);
            if dir.is_empty() || dir == "." {
                None
            } else {
                Some(dir.replace('/', MAIN_SEPARATOR_STR))
            }
        })
        .collect()
}
