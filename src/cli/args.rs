//! Command line argument parsing and validation.
//!
//! Secrets are never taken as flags; they come from the environment only
//! (see [`ReleaseConfig`](crate::release::ReleaseConfig)).

use crate::release::settings::{
    DEFAULT_CONFIGURATION, DEFAULT_DESTINATION, DEFAULT_PROJECT_NAME, ProjectSettings,
};
use clap::Parser;
use path_absolutize::Absolutize;
use std::path::PathBuf;

/// Release pipeline for the char macOS app
#[derive(Parser, Debug)]
#[command(
    name = "char-release",
    version,
    about = "Build, sign, notarize and publish the char macOS app",
    long_about = "Builds the app with xcodebuild, signs it (including the embedded Sparkle.framework), \
notarizes and staples the app and its DMG, then signs the DMG for Sparkle and regenerates appcast.xml.

Required env vars:
  DEV_ID_APPLICATION   Codesigns the app bundle and DMG.
  AC_API_KEY_ID        App Store Connect API key id.
  AC_API_KEY           App Store Connect API key (.p8 content).
  AC_API_ISSUER_ID     Optional, needed for Team API keys.
  SPARKLE_PRIVATE_KEY  Base64 key from the Sparkle keychain item (no quotes).

Deliverables land in build/release/. Exit code 0 = DMG and appcast.xml published."
)]
pub struct Args {
    /// Directory holding <project-name>.xcodeproj
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,

    /// Xcode project and product name
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PROJECT_NAME)]
    pub project_name: String,

    /// Xcode scheme (defaults to the project name)
    #[arg(long, value_name = "SCHEME")]
    pub scheme: Option<String>,

    /// Build configuration
    #[arg(long, value_name = "CONFIG", default_value = DEFAULT_CONFIGURATION)]
    pub configuration: String,

    /// xcodebuild -destination value
    #[arg(long, value_name = "SPEC", default_value = DEFAULT_DESTINATION)]
    pub destination: String,

    /// Directory containing Sparkle's sign_update and generate_appcast
    #[arg(long, env = "SPARKLE_BIN", value_name = "DIR")]
    pub sparkle_bin: Option<PathBuf>,

    /// Validate configuration and tools, print the plan, run nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the PATH check for Xcode tools
    #[arg(long)]
    pub skip_preflight: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.project_name.trim().is_empty() {
            return Err("Project name cannot be empty".to_string());
        }
        if self.project_name.contains(['/', '\\']) {
            return Err(format!(
                "Invalid project name: {}. Use --project-root for the directory",
                self.project_name
            ));
        }
        if !self.project_root.is_dir() {
            return Err(format!(
                "Project root does not exist: {}",
                self.project_root.display()
            ));
        }
        Ok(())
    }

    /// Project coordinates described by these arguments.
    ///
    /// The root is made absolute against the current directory.
    pub fn project_settings(&self) -> Result<ProjectSettings, String> {
        let root = self.project_root.absolutize().map_err(|e| {
            format!(
                "Cannot resolve project root {}: {e}",
                self.project_root.display()
            )
        })?;
        let project = ProjectSettings::new(root.into_owned(), &self.project_name)
            .configuration(&self.configuration)
            .destination(&self.destination);
        Ok(match &self.scheme {
            Some(scheme) => project.scheme(scheme),
            None => project,
        })
    }
}
