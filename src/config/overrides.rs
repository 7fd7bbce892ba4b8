use serde::Serialize;
use std::path::PathBuf;

/// Settings given on the command line
///
/// Unset flags are left out of the serialized form so they never mask a
/// value coming from a config file or the environment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_extensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_dirs: Option<String>,
}
