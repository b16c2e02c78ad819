//! Error types for chartstyle operations.

use thiserror::Error;

use crate::chart::ChartError;
use crate::template::TemplateError;

/// Errors that can occur while loading inputs or running a command.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Chart(#[from] ChartError),

    #[error("{0}")]
    Template(#[from] TemplateError),
}

pub type Result<T> = std::result::Result<T, Error>;
