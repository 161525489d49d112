//! The set of external tools a release run drives.

use crate::release::{
    platform::macos::{
        AppBuilder, ArchiveBuilder, Codesign, FeedPublisher, Hdiutil, NotaryTool, Notarizer,
        Signer, SparkleCli, ToolsetSearch, XcodeBuild,
    },
    process::{CommandRunner, SystemRunner},
};
use std::sync::Arc;

/// One implementation per capability.
pub struct Toolchain {
    /// Builds the app
    pub builder: Box<dyn AppBuilder>,
    /// Signs code and disk images
    pub signer: Box<dyn Signer>,
    /// Notarizes and staples
    pub notarizer: Box<dyn Notarizer>,
    /// Creates the zip and DMG
    pub archiver: Box<dyn ArchiveBuilder>,
    /// Signs updates and regenerates the appcast
    pub feed: Box<dyn FeedPublisher>,
}

impl std::fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolchain").finish_non_exhaustive()
    }
}

impl Toolchain {
    /// Real tools, run as child processes.
    pub fn system(identity: &str, sparkle: ToolsetSearch) -> Self {
        Self::with_runner(identity, sparkle, Arc::new(SystemRunner))
    }

    /// Real tool invocations routed through `runner`.
    pub fn with_runner(
        identity: &str,
        sparkle: ToolsetSearch,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            builder: Box::new(XcodeBuild::new(runner.clone())),
            signer: Box::new(Codesign::new(identity, runner.clone())),
            notarizer: Box::new(NotaryTool::new(runner.clone())),
            archiver: Box::new(Hdiutil::new(runner.clone())),
            feed: Box::new(SparkleCli::new(sparkle, runner)),
        }
    }
}
