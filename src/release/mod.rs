//! Release pipeline for the char macOS app.
//!
//! Builds the app with Xcode, signs it and its embedded Sparkle framework,
//! notarizes and staples both the app and its DMG, then signs the DMG for
//! Sparkle and regenerates the appcast.
//!
//! # Layout
//!
//! - [`settings`] - credentials, project coordinates and artifact paths
//! - [`builder`] - the [`ReleasePipeline`] orchestrator and its stages
//! - [`platform`] - capability traits and their real tool implementations
//! - [`process`] - external process execution
//! - [`secret`] - scoped temporary key files
//! - [`utils`] - idempotent filesystem helpers

pub mod builder;
pub mod error;
pub mod platform;
pub mod process;
pub mod secret;
pub mod settings;
pub mod utils;

pub use builder::{ReleasePipeline, ReleaseReport, Stage, Toolchain};
pub use error::{Error, Result};
pub use platform::macos::{
    AppBuilder, ArchiveBuilder, FeedPublisher, NotaryCredentials, Notarizer, Signer,
    SparkleToolset, ToolsetSearch,
};
pub use process::{CommandRunner, CommandSpec, StageResult, SystemRunner};
pub use settings::{ProjectSettings, ReleaseConfig, ReleasePaths};
