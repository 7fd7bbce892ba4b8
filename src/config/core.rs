use super::{CliOverrides, Settings, smart_load};
use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::path::Path;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Prefix of environment variables read as settings (`COMBINE_CODE_OUTPUT`, ...)
pub const ENV_PREFIX: &str = "COMBINE_CODE_";

/// Config files picked up from the working directory when `--config` is not given
pub const REPO_CONFIG_FILES: [&str; 4] = [
    "combine-code.toml",
    "combine-code.json",
    "combine-code.yaml",
    "combine-code.yml",
];

impl Settings {
    /// Layered configuration, lowest priority first:
    /// embedded defaults, config file, `COMBINE_CODE_*` environment, command line.
    pub fn figment(
        config_file: Option<&Path>,
        search_dir: &Path,
        overrides: &CliOverrides,
    ) -> Result<Figment> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        // A custom config replaces the repository files instead of stacking on them
        if let Some(custom_path) = config_file {
            if !custom_path.is_file() {
                bail!("Config file not found: {}", custom_path.display());
            }
            tracing::debug!("Using config file {}", custom_path.display());
            figment = figment.merge(smart_load::auto(custom_path));
        } else {
            for name in REPO_CONFIG_FILES {
                let candidate = search_dir.join(name);
                if candidate.is_file() {
                    tracing::debug!("Using config file {}", candidate.display());
                }
                figment = figment.merge(smart_load::auto(candidate));
            }
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides)))
    }

    /// Load and merge every layer
    pub fn load(
        config_file: Option<&Path>,
        search_dir: &Path,
        overrides: &CliOverrides,
    ) -> Result<Self> {
        Self::figment(config_file, search_dir, overrides)?
            .extract()
            .context("Invalid configuration")
    }
}
