use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Rejected game configuration, raised before any state is built.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration for `{parameter}`: {reason}")]
    InvalidConfiguration {
        parameter: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }

    /// Returns the name of the offending parameter.
    #[must_use]
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { parameter, .. } => parameter,
        }
    }
}

/// Failures surfaced by the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to parse config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
