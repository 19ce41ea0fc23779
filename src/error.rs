//! Error types for the amortization engine and its file collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while computing a schedule.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoanError {
    /// A loan parameter violates its precondition.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The arithmetic produced a non-finite or out-of-range amount.
    #[error("degenerate arithmetic: {reason}")]
    ArithmeticDegenerate { reason: String },
}

impl LoanError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::ArithmeticDegenerate {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading or saving loan parameters.
#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize loan parameters: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors raised while exporting a schedule.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
}
