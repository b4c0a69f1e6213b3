//! jv settings (`config.toml`)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Architecture, JvError, Result, paths};

/// jv configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Distributor used when `jv install` is run without `--distributor`
    pub default_distributor: String,

    /// Architecture override (defaults to the running binary's)
    pub architecture: Option<Architecture>,

    /// Base directory for machine-wide installs
    pub system_install_dir: PathBuf,

    /// Base directory for user-only installs
    pub user_install_dir: PathBuf,

    /// How long `java -version` may run before the version is reported unknown
    pub version_query_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_distributor: "adoptium".to_string(),
            architecture: None,
            system_install_dir: paths::system_install_dir(),
            user_install_dir: paths::user_install_dir(),
            version_query_timeout_secs: 5,
        }
    }
}

impl Settings {
    /// Load settings from the config file, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| {
                JvError::InvalidInput(format!("{}: {e}", config_path.display()))
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Get the config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        paths::settings_path()
    }

    #[must_use]
    pub fn version_query_timeout(&self) -> Duration {
        Duration::from_secs(self.version_query_timeout_secs.max(1))
    }

    /// Architecture to request from distributors
    #[must_use]
    pub fn target_architecture(&self) -> Option<Architecture> {
        self.architecture.or_else(Architecture::current)
    }
}
