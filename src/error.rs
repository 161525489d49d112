//! Top-level error types for the release command.
//!
//! Wraps pipeline errors and CLI errors, and turns each into actionable
//! follow-up lines for the operator.

use thiserror::Error;

/// Result type alias for the release command
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for the release command
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Pipeline errors
    #[error("{0}")]
    Release(#[from] crate::release::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::release::Error;

        match self {
            Self::Release(Error::NotarizationRejected {
                label, id, hint, ..
            }) => {
                let mut lines = Vec::new();
                if let Some(id) = id {
                    lines.push(format!(
                        "Notarization failed for {label}. Submission id: {id}"
                    ));
                }
                lines.extend(hint.clone());
                lines
            }
            Self::Release(Error::CommandFailed { stderr, .. }) if !stderr.is_empty() => {
                vec![stderr.clone()]
            }
            Self::Release(Error::MissingToolset { .. }) => {
                vec!["Or point SPARKLE_BIN at the directory holding sign_update".to_string()]
            }
            _ => Vec::new(),
        }
    }
}
