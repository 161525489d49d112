//! Code signing with `codesign`.
//!
//! Apple requires nested code to be signed inside-out: every helper executable
//! and XPC service in Sparkle.framework gets its own hardened-runtime
//! signature before the framework, and the framework before the app.

use crate::release::{
    error::Result,
    process::{CommandRunner, CommandSpec},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CODESIGN: &str = "/usr/bin/codesign";

/// Framework path inside the app bundle.
pub const SPARKLE_FRAMEWORK: &str = "Contents/Frameworks/Sparkle.framework";

/// Nested Sparkle components, relative to `Versions/B`, in signing order.
///
/// Executables come before the bundles that contain them.
pub const SPARKLE_COMPONENTS: [&str; 7] = [
    "Updater.app/Contents/MacOS/Updater",
    "Autoupdate",
    "XPCServices/Downloader.xpc/Contents/MacOS/Downloader",
    "XPCServices/Installer.xpc/Contents/MacOS/Installer",
    "Updater.app",
    "XPCServices/Downloader.xpc",
    "XPCServices/Installer.xpc",
];

/// Signs code with a Developer ID identity.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Signs a nested executable, bundle or framework with hardened runtime and timestamp.
    async fn sign_component(&self, path: &Path) -> Result<()>;

    /// Signs the app bundle with hardened runtime, timestamp and entitlements.
    async fn sign_app(&self, app: &Path, entitlements: &Path) -> Result<()>;

    /// Signs a disk image with a timestamp.
    async fn sign_disk_image(&self, dmg: &Path) -> Result<()>;
}

/// [`Signer`] backed by `/usr/bin/codesign`.
pub struct Codesign {
    identity: String,
    runner: Arc<dyn CommandRunner>,
}

impl Codesign {
    /// Creates a signer for `identity`.
    pub fn new(identity: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            identity: identity.into(),
            runner,
        }
    }

    fn hardened(&self) -> CommandSpec {
        CommandSpec::new(CODESIGN).args(["--force", "--options", "runtime", "--timestamp"])
    }

    /// `codesign --force --options runtime --timestamp --sign <id> <path>`
    pub fn component_command(&self, path: &Path) -> CommandSpec {
        self.hardened()
            .arg("--sign")
            .arg(&self.identity)
            .arg(path)
    }

    /// Same as [`Codesign::component_command`] plus `--entitlements`.
    pub fn app_command(&self, app: &Path, entitlements: &Path) -> CommandSpec {
        self.hardened()
            .arg("--entitlements")
            .arg(entitlements)
            .arg("--sign")
            .arg(&self.identity)
            .arg(app)
    }

    /// `codesign --force --timestamp --sign <id> <dmg>`
    pub fn disk_image_command(&self, dmg: &Path) -> CommandSpec {
        CommandSpec::new("codesign")
            .args(["--force", "--timestamp", "--sign"])
            .arg(&self.identity)
            .arg(dmg)
    }
}

#[async_trait]
impl Signer for Codesign {
    async fn sign_component(&self, path: &Path) -> Result<()> {
        log::debug!("Signing {}", path.display());
        self.runner.run(&self.component_command(path)).await?;
        Ok(())
    }

    async fn sign_app(&self, app: &Path, entitlements: &Path) -> Result<()> {
        log::info!("Signing {}", app.display());
        self.runner.run(&self.app_command(app, entitlements)).await?;
        Ok(())
    }

    async fn sign_disk_image(&self, dmg: &Path) -> Result<()> {
        log::info!("Signing {}", dmg.display());
        self.runner.run(&self.disk_image_command(dmg)).await?;
        Ok(())
    }
}

/// Signs Sparkle's nested components and then the framework itself.
///
/// Components missing from the bundle are skipped with a warning; a missing
/// framework signs nothing. Returns the paths that were signed, in order.
pub async fn sign_sparkle_framework(signer: &dyn Signer, app: &Path) -> Result<Vec<PathBuf>> {
    let framework = app.join(SPARKLE_FRAMEWORK);
    let version = framework.join("Versions/B");

    let targets = SPARKLE_COMPONENTS
        .iter()
        .map(|component| version.join(component))
        .chain(std::iter::once(framework));

    let mut signed = Vec::new();
    for target in targets {
        if tokio::fs::symlink_metadata(&target).await.is_err() {
            log::warn!("Skipping missing Sparkle component: {}", target.display());
            continue;
        }
        signer.sign_component(&target).await?;
        signed.push(target);
    }

    Ok(signed)
}
