//! Error types for release pipeline operations.
//!
//! Every failure the pipeline can hit is terminal. The variants are grouped the
//! way an operator needs to react to them: configuration to fix before
//! anything runs, a tool that exited non-zero, a notarization verdict that
//! rejected the artifact, or a toolset that is not installed.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, Error>;

/// Setup note printed alongside every configuration error.
pub const REQUIRED_ENV_NOTE: &str = "Required env vars:
- DEV_ID_APPLICATION: Codesigns the app bundle and DMG.
- AC_API_KEY_ID / AC_API_KEY: App Store Connect API key for notarization.
- AC_API_ISSUER_ID (optional): Needed for Team API keys.
- SPARKLE_PRIVATE_KEY: Base64 key from Sparkle keychain item (no quotes).";

/// Main error type for the release pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required configuration values are absent or blank
    #[error("{}\nMissing {}", REQUIRED_ENV_NOTE, .missing.join(", "))]
    MissingConfiguration {
        /// Names of every missing variable, in declaration order
        missing: Vec<&'static str>,
    },

    /// A configuration value is present but unusable
    #[error("{}\nInvalid {name}: {reason}", REQUIRED_ENV_NOTE)]
    InvalidConfiguration {
        /// Variable name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// An external tool could not be started at all
    #[error("Failed to execute {command}: {source}")]
    CommandSpawn {
        /// Program name
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited with a non-zero status
    #[error("Command failed: {command} (exit code: {})", display_code(.code))]
    CommandFailed {
        /// Program name
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The notarization service accepted the upload but rejected the artifact
    #[error("Notarization failed for {label} (status: {status})")]
    NotarizationRejected {
        /// Human label of the artifact ("app zip", "DMG")
        label: String,
        /// Reported status, e.g. "Invalid"
        status: String,
        /// Submission id, when the service returned one
        id: Option<String>,
        /// Command to fetch the rejection log
        hint: Option<String>,
    },

    /// notarytool exited cleanly but its output carried no verdict
    #[error("Unreadable notarization response for {label}: {reason}")]
    MalformedNotarization {
        /// Human label of the artifact
        label: String,
        /// Parse failure or missing field
        reason: String,
    },

    /// Sparkle's signing tools were not found in any probed location
    #[error("Missing Sparkle tools. Install with: brew install sparkle (searched: {})", .searched.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    MissingToolset {
        /// Candidate directories that were probed
        searched: Vec<PathBuf>,
    },

    /// Required host tools are not on PATH
    #[error("Missing host tools: {}. Install Xcode and its command line tools.", .tools.join(", "))]
    MissingHostTool {
        /// Tool names that were not found
        tools: Vec<String>,
    },

    /// Filesystem error with the operation and path that failed
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Directory walk errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Path prefix errors while mirroring trees
    #[error("Path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else, with a message
    #[error("{0}")]
    GenericError(String),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

impl Error {
    /// Whether this failure is a notarization verdict rather than a tool failure.
    pub fn is_verdict_rejection(&self) -> bool {
        matches!(self, Self::NotarizationRejected { .. })
    }
}

/// Attaches the failing operation and path to IO errors.
pub trait ErrorExt<T> {
    /// Wrap the error as [`Error::Fs`].
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Adds a lazily built message to any release error.
pub trait Context<T> {
    /// Prefix the error with the message returned by `f`.
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> Context<T> for Result<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {}", f().into(), e)))
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::release::Error::GenericError(format!($($arg)*)))
    };
}
