//! Release pipeline library for the char macOS app
//!
//! This library drives the full release of the app:
//! - Xcode build and app bundle staging
//! - Code signing (nested Sparkle components, app, DMG)
//! - Notarization and stapling of the app zip and the DMG
//! - Sparkle update signing and appcast generation
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod release;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
