//! Sparkle update feed: EdDSA signatures and appcast generation.
//!
//! - [`toolset`] finds Sparkle's command line tools on disk.
//!
//! The private key is handed to the tools as a file path; callers own the
//! file's lifetime (see [`crate::release::secret::SecretFile`]).

pub mod toolset;

use crate::release::{
    error::Result,
    process::{CommandRunner, CommandSpec},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use toolset::{CASK_ROOTS, SparkleToolset, ToolsetSearch};

/// Signs release archives and regenerates the update feed.
#[async_trait]
pub trait FeedPublisher: Send + Sync {
    /// Finds the signing toolset.
    fn locate(&self) -> Result<SparkleToolset>;

    /// Signs `archive` with the key in `key_file`; returns the signature line.
    async fn sign_update(
        &self,
        tools: &SparkleToolset,
        key_file: &Path,
        archive: &Path,
    ) -> Result<String>;

    /// Regenerates `appcast` from every archive in `release_dir`.
    async fn generate_appcast(
        &self,
        tools: &SparkleToolset,
        key_file: &Path,
        release_dir: &Path,
        appcast: &Path,
    ) -> Result<()>;
}

/// [`FeedPublisher`] backed by Sparkle's `sign_update` and `generate_appcast`.
pub struct SparkleCli {
    search: ToolsetSearch,
    runner: Arc<dyn CommandRunner>,
}

impl SparkleCli {
    /// Creates a publisher probing `search` and running through `runner`.
    pub fn new(search: ToolsetSearch, runner: Arc<dyn CommandRunner>) -> Self {
        Self { search, runner }
    }
}

/// `sign_update -f <key> <archive>`
pub fn sign_update_command(tools: &SparkleToolset, key_file: &Path, archive: &Path) -> CommandSpec {
    CommandSpec::new(&tools.sign_update)
        .arg("-f")
        .arg(key_file)
        .arg(archive)
}

/// `generate_appcast --ed-key-file <key> -o <appcast> <release_dir>`
pub fn generate_appcast_command(
    tools: &SparkleToolset,
    key_file: &Path,
    release_dir: &Path,
    appcast: &Path,
) -> CommandSpec {
    CommandSpec::new(&tools.generate_appcast)
        .arg("--ed-key-file")
        .arg(key_file)
        .arg("-o")
        .arg(appcast)
        .arg(release_dir)
}

#[async_trait]
impl FeedPublisher for SparkleCli {
    fn locate(&self) -> Result<SparkleToolset> {
        self.search.locate()
    }

    async fn sign_update(
        &self,
        tools: &SparkleToolset,
        key_file: &Path,
        archive: &Path,
    ) -> Result<String> {
        log::info!("Signing update {}", archive.display());
        let spec = sign_update_command(tools, key_file, archive).quiet();
        Ok(self.runner.run(&spec).await?.stdout_text())
    }

    async fn generate_appcast(
        &self,
        tools: &SparkleToolset,
        key_file: &Path,
        release_dir: &Path,
        appcast: &Path,
    ) -> Result<()> {
        log::info!("Generating {}", appcast.display());
        self.runner
            .run(&generate_appcast_command(tools, key_file, release_dir, appcast))
            .await?;
        Ok(())
    }
}

/// Directory an override points at, accepting either the bin dir or a tool inside it.
pub fn normalize_override(path: PathBuf) -> PathBuf {
    if path.is_file() {
        path.parent().map(Path::to_path_buf).unwrap_or(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkle_commands() {
        let tools = SparkleToolset::in_dir(Path::new("/opt/sparkle/bin"));
        let sign = sign_update_command(&tools, Path::new("/tmp/k"), Path::new("build/char.dmg"));
        assert_eq!(sign.program(), "/opt/sparkle/bin/sign_update");
        assert_eq!(sign.args_lossy(), vec!["-f", "/tmp/k", "build/char.dmg"]);

        let appcast = generate_appcast_command(
            &tools,
            Path::new("/tmp/k"),
            Path::new("build/release"),
            Path::new("build/release/appcast.xml"),
        );
        assert_eq!(
            appcast.args_lossy(),
            vec![
                "--ed-key-file",
                "/tmp/k",
                "-o",
                "build/release/appcast.xml",
                "build/release",
            ]
        );
    }

    #[test]
    fn override_may_name_a_tool() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = tmp.path().join("sign_update");
        std::fs::write(&tool, "").unwrap();
        assert_eq!(normalize_override(tool), tmp.path());
        assert_eq!(normalize_override(tmp.path().to_path_buf()), tmp.path());
    }
}
