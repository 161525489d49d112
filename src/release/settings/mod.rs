//! Configuration for a release run.
//!
//! - [`ReleaseConfig`] holds the secrets, read from the environment and
//!   validated as a whole before any stage runs.
//! - [`ProjectSettings`] names the Xcode project, scheme and configuration.
//! - [`ReleasePaths`] derives every artifact location from the project.

mod config;
mod paths;
mod project;

pub use config::{
    AC_API_ISSUER_ID, AC_API_KEY, AC_API_KEY_ID, DEV_ID_APPLICATION, REQUIRED_ENV,
    ReleaseConfig, SPARKLE_PRIVATE_KEY,
};
pub use paths::{APPCAST_FILE, ENTITLEMENTS_FILE, ReleasePaths};
pub use project::{
    DEFAULT_CONFIGURATION, DEFAULT_DESTINATION, DEFAULT_PROJECT_NAME, ProjectSettings,
};
