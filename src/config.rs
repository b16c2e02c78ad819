//! Runtime configuration.
//!
//! Read from an optional TOML file; every key may be omitted:
//!
//! ```toml
//! template_store = "templates.json"
//! log_level = "debug"
//! default_plot_height = 240.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::apply::ApplyOptions;
use crate::error::Result;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "chartstyle.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON file holding saved templates.
    pub template_store: PathBuf,
    pub log_level: String,
    /// Height used for frames that report none.
    pub default_plot_height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            template_store: PathBuf::from("templates.json"),
            log_level: "info".to_string(),
            default_plot_height: ApplyOptions::default().default_plot_height,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "loaded config");
                Self::from_toml(&text)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            default_plot_height: self.default_plot_height,
        }
    }
}
