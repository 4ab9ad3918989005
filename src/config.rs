//! Application configuration management.
//!
//! Settings are layered, later layers overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `config.toml` in the platform config dir)
//! 3. Environment variables prefixed `TAKEOUT_REORG_`
//! 4. CLI flags
//!
//! Only the glue around the pipeline is configurable. The reorganization
//! itself takes nothing but the source and target paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::metadata::DEFAULT_EXIFTOOL;
use crate::reorg::layout::DEFAULT_SOURCE_ROOT_DIR;

/// Prefix of environment variables read into [`Config`].
pub const ENV_PREFIX: &str = "TAKEOUT_REORG_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Metadata tool executable.
    pub exiftool: String,
    /// Skip the metadata post-processing step.
    pub skip_metadata: bool,
    /// Show progress bars.
    pub progress: bool,
    /// Name of the photo root directory inside the source directory.
    pub source_root_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exiftool: DEFAULT_EXIFTOOL.to_string(),
            skip_metadata: false,
            progress: true,
            source_root_dir: DEFAULT_SOURCE_ROOT_DIR.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, file and environment, then apply
    /// CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested file does not exist, or
    /// if any layer fails to parse.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match cli.config {
            Some(ref path) => {
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.clone())
            }
            None => Self::default_path(),
        };

        let mut config = Self::from_figment(Self::figment(file.as_deref()))?;
        config.apply_cli(cli);
        Ok(config)
    }

    /// Build the layered provider stack without CLI overrides.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            log::debug!("Reading config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract a configuration from a provider stack.
    ///
    /// # Errors
    ///
    /// Returns an error if a value has the wrong type.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        figment
            .extract()
            .context("Failed to load configuration")
    }

    /// Apply CLI flags on top of the loaded layers.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref exiftool) = cli.exiftool {
            self.exiftool.clone_from(exiftool);
        }
        if cli.skip_metadata {
            self.skip_metadata = true;
        }
        if cli.no_progress || cli.quiet {
            self.progress = false;
        }
    }

    /// The default platform-specific configuration path, if one exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "takeout-reorg")?;
        let path = project_dirs.config_dir().join("config.toml");
        path.is_file().then_some(path)
    }
}
