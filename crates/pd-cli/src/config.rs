//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pd_core::Policy;
use pd_report::DEFAULT_OUTPUT;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the CSV is written.
    pub output_path: PathBuf,

    /// Optional file receiving a copy of the log output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Parsing policy.
    pub policy: Policy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            log_file: None,
            policy: Policy::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`,
    /// then `PAYDAY_*` environment variables (`__` separates nested keys).
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(format!("config file not found: {}", path.display()).into());
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("PAYDAY_").split("__"));

        figment.extract()
    }

    /// Applies command-line flags on top of the loaded values.
    #[must_use]
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(output) = &cli.output {
            self.output_path.clone_from(output);
        }
        if cli.no_default_lunch {
            self.policy.subtract_lunch_by_default = false;
        }
        if let Some(tolerance) = cli.tolerance {
            self.policy.cover_tolerance_seconds = tolerance;
        }
        if let Some(task_case) = cli.task_case {
            self.policy.task_case = task_case;
        }
        self
    }
}

/// Returns the platform-specific config directory for payday.
///
/// On Linux: `~/.config/payday`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("payday"))
}
