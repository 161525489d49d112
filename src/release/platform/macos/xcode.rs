//! Building the app with xcodebuild.

use crate::release::{
    error::Result,
    process::{CommandRunner, CommandSpec},
    settings::{ProjectSettings, ReleasePaths},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Produces the unsigned-for-distribution app bundle.
#[async_trait]
pub trait AppBuilder: Send + Sync {
    /// Builds the project into `paths.derived_data`, signing with `identity`.
    async fn build(
        &self,
        project: &ProjectSettings,
        paths: &ReleasePaths,
        identity: &str,
    ) -> Result<()>;
}

/// [`AppBuilder`] backed by `xcodebuild`.
pub struct XcodeBuild {
    runner: Arc<dyn CommandRunner>,
}

impl XcodeBuild {
    /// Creates a builder that runs through `runner`.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

/// The xcodebuild invocation for `project`.
pub fn build_command(project: &ProjectSettings, paths: &ReleasePaths, identity: &str) -> CommandSpec {
    CommandSpec::new("xcodebuild")
        .arg("-project")
        .arg(project.xcodeproj())
        .arg("-scheme")
        .arg(project.scheme_name())
        .arg("-configuration")
        .arg(project.configuration_name())
        .arg("-derivedDataPath")
        .arg(&paths.derived_data)
        .arg("-destination")
        .arg(project.destination_spec())
        .arg(format!("CODE_SIGN_IDENTITY={identity}"))
        .arg("CODE_SIGN_STYLE=Manual")
        .arg("build")
        .current_dir(project.root())
}

#[async_trait]
impl AppBuilder for XcodeBuild {
    async fn build(
        &self,
        project: &ProjectSettings,
        paths: &ReleasePaths,
        identity: &str,
    ) -> Result<()> {
        log::info!(
            "Building {} ({} / {})",
            project.xcodeproj(),
            project.scheme_name(),
            project.configuration_name()
        );
        self.runner
            .run(&build_command(project, paths, identity))
            .await?;
        Ok(())
    }
}
