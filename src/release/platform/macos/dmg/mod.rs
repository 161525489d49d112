//! Archives: the notarization zip and the distributable disk image.
//!
//! - [`creation`] stages the disk image folder and builds the hdiutil and
//!   ditto invocations.
//!
//! The DMG is created compressed and read-only (UDZO) straight from a clean
//! staging folder that holds only the signed, stapled app.

mod creation;

use crate::release::{error::Result, process::CommandRunner};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub use creation::{create_dmg_command, stage_disk_image, zip_command};

/// Produces the zip and disk image archives.
#[async_trait]
pub trait ArchiveBuilder: Send + Sync {
    /// Zips `app` into `zip`, keeping the bundle directory as the top entry.
    async fn zip_app(&self, app: &Path, zip: &Path) -> Result<()>;

    /// Builds a compressed read-only disk image of `source_dir` named `volume_name`.
    async fn create_disk_image(&self, volume_name: &str, source_dir: &Path, dmg: &Path)
    -> Result<()>;
}

/// [`ArchiveBuilder`] backed by `ditto` and `hdiutil`.
pub struct Hdiutil {
    runner: Arc<dyn CommandRunner>,
}

impl Hdiutil {
    /// Creates an archiver that runs through `runner`.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ArchiveBuilder for Hdiutil {
    async fn zip_app(&self, app: &Path, zip: &Path) -> Result<()> {
        log::info!("Zipping {} for notarization", app.display());
        self.runner.run(&zip_command(app, zip)).await?;
        Ok(())
    }

    async fn create_disk_image(
        &self,
        volume_name: &str,
        source_dir: &Path,
        dmg: &Path,
    ) -> Result<()> {
        log::info!("Creating UDZO DMG {}", dmg.display());
        self.runner
            .run(&create_dmg_command(volume_name, source_dir, dmg))
            .await?;
        log::info!("✓ Created DMG: {}", dmg.display());
        Ok(())
    }
}
