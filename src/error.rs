//! Error kinds and their process exit codes.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Top-level error for a single analysis run.
///
/// Every variant is fatal once it reaches `main`; the binary prints it and exits
/// with [`AppError::exit_code`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing FRED_API_KEY in environment (.env) and an API key is required.")]
    CredentialMissing,

    #[error("Failed to retrieve FRED series {series_id}: {reason}")]
    Retrieval { series_id: String, reason: String },

    #[error(transparent)]
    Estimation(#[from] EstimationError),

    #[error("Failed to write '{}': {reason}", path.display())]
    Filesystem { path: PathBuf, reason: String },

    #[error("Failed to write regression summary: {0}")]
    Output(#[source] std::io::Error),
}

impl AppError {
    pub fn retrieval(series_id: &str, reason: impl Into<String>) -> Self {
        Self::Retrieval {
            series_id: series_id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn filesystem(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::Filesystem {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::CredentialMissing => 2,
            AppError::Retrieval { .. } => 3,
            AppError::Estimation(_) => 4,
            AppError::Filesystem { .. } | AppError::Output(_) => 5,
        }
    }
}

/// Reasons the regression could not be estimated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimationError {
    #[error("Column '{0}' is not present in the table.")]
    UnknownColumn(String),

    #[error(
        "Cannot fit regression: {rows} complete rows for {params} parameters (including intercept)."
    )]
    Underdetermined { rows: usize, params: usize },

    #[error("Cannot fit regression: regressors are collinear (X'X is singular).")]
    Singular,
}
