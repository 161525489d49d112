//! Main release orchestration.
//!
//! This module provides the [`ReleasePipeline`] that drives every
//! [`Stage`] in order against a [`Toolchain`].

use super::{checksum::calculate_sha256, stage::Stage, toolchain::Toolchain};
use crate::release::{
    error::{Error, Result},
    platform::macos::{
        NotaryCredentials, SparkleToolset, notarize, sign_sparkle_framework, stage_app_bundle,
        stage_disk_image, write_entitlements,
    },
    secret::SecretFile,
    settings::{ProjectSettings, ReleaseConfig, ReleasePaths},
    utils::fs,
};
use std::path::PathBuf;

/// File name notarytool expects for App Store Connect keys.
const NOTARY_KEY_FILE: &str = "AuthKey.p8";
/// File name of the temporary Sparkle key.
const SPARKLE_KEY_FILE: &str = "sparkle_private_key";

/// Deliverables of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    /// Published DMG in the release directory
    pub dmg: PathBuf,
    /// Regenerated update feed
    pub appcast: PathBuf,
    /// `sign_update` output, when it printed one
    pub signature: Option<String>,
    /// SHA-256 of the published DMG
    pub sha256: String,
    /// Stages that ran, in order
    pub stages: Vec<Stage>,
}

/// Per-run state that lives between stages.
///
/// Secrets are owned here so dropping the state deletes them, whichever
/// stage the run stopped at.
#[derive(Default)]
struct RunState {
    notary_key: Option<SecretFile>,
    credentials: Option<NotaryCredentials>,
    toolset: Option<SparkleToolset>,
    feed_key: Option<SecretFile>,
    signature: Option<String>,
    sha256: Option<String>,
    completed: Vec<Stage>,
}

impl RunState {
    fn credentials(&self) -> Result<&NotaryCredentials> {
        self.credentials
            .as_ref()
            .ok_or_else(|| Error::GenericError("notarization key was not prepared".into()))
    }

    fn toolset(&self) -> Result<&SparkleToolset> {
        self.toolset
            .as_ref()
            .ok_or_else(|| Error::GenericError("Sparkle tools were not located".into()))
    }

    fn feed_key(&self) -> Result<&SecretFile> {
        self.feed_key
            .as_ref()
            .ok_or_else(|| Error::GenericError("Sparkle key was not written".into()))
    }

    /// Deletes every secret still held, returning the first failure.
    fn release_secrets(&mut self) -> Result<()> {
        let mut first_err = None;
        for secret in [self.feed_key.take(), self.notary_key.take()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = secret.close() {
                log::warn!("Failed to remove temporary secret: {e}");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Release pipeline orchestrator.
///
/// Runs [`Stage::ALL`] in order and stops at the first failure. Temporary key
/// files are removed on every exit path.
pub struct ReleasePipeline {
    config: ReleaseConfig,
    project: ProjectSettings,
    paths: ReleasePaths,
    toolchain: Toolchain,
    secret_dir: PathBuf,
}

impl std::fmt::Debug for ReleasePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleasePipeline")
            .field("config", &self.config)
            .field("project", &self.project)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl ReleasePipeline {
    /// Creates a pipeline for `project`. The configuration is already validated.
    pub fn new(config: ReleaseConfig, project: ProjectSettings, toolchain: Toolchain) -> Self {
        let paths = ReleasePaths::new(&project);
        Self {
            config,
            project,
            paths,
            toolchain,
            secret_dir: std::env::temp_dir(),
        }
    }

    /// Writes temporary key files under `dir` instead of the system temp dir.
    pub fn secret_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.secret_dir = dir.into();
        self
    }

    /// Artifact locations for this run.
    pub fn paths(&self) -> &ReleasePaths {
        &self.paths
    }

    /// Runs every stage.
    pub async fn run(&self) -> Result<ReleaseReport> {
        let mut state = RunState::default();
        let outcome = self.run_stages(&mut state).await;
        let cleanup = state.release_secrets();

        match outcome {
            Ok(()) => {
                cleanup?;
                Ok(ReleaseReport {
                    dmg: self.paths.release_dmg.clone(),
                    appcast: self.paths.appcast.clone(),
                    signature: state.signature.take(),
                    sha256: state.sha256.take().unwrap_or_default(),
                    stages: std::mem::take(&mut state.completed),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn run_stages(&self, state: &mut RunState) -> Result<()> {
        let total = Stage::ALL.len();
        for (index, stage) in Stage::ALL.into_iter().enumerate() {
            log::info!("[{}/{}] {}", index + 1, total, stage);
            if let Err(e) = self.run_stage(stage, state).await {
                log::error!("Stage failed: {stage}");
                return Err(e);
            }
            state.completed.push(stage);
        }
        Ok(())
    }

    async fn run_stage(&self, stage: Stage, state: &mut RunState) -> Result<()> {
        let paths = &self.paths;
        let tools = &self.toolchain;

        match stage {
            Stage::Prepare => {
                fs::create_dir_all(&paths.build_dir, false).await?;
                fs::create_dir_all(&paths.release_dir, false).await?;

                let key = SecretFile::create_in(
                    &self.secret_dir,
                    "notary",
                    NOTARY_KEY_FILE,
                    &self.config.api_key,
                )?;
                state.credentials = Some(NotaryCredentials {
                    key_path: key.path().to_path_buf(),
                    key_id: self.config.api_key_id.clone(),
                    issuer: self.config.api_issuer_id.clone(),
                });
                state.notary_key = Some(key);
            }
            Stage::Build => {
                tools
                    .builder
                    .build(&self.project, paths, &self.config.signing_identity)
                    .await?;
            }
            Stage::StageApp => stage_app_bundle(paths).await?,
            Stage::Entitlements => write_entitlements(&paths.entitlements).await?,
            Stage::SignNested => {
                let signed = sign_sparkle_framework(tools.signer.as_ref(), &paths.app).await?;
                log::info!("Signed {} Sparkle component(s)", signed.len());
            }
            Stage::SignApp => {
                tools
                    .signer
                    .sign_app(&paths.app, &paths.entitlements)
                    .await?;
            }
            Stage::Zip => tools.archiver.zip_app(&paths.app, &paths.zip).await?,
            Stage::NotarizeZip => {
                notarize(
                    tools.notarizer.as_ref(),
                    &paths.zip,
                    "app zip",
                    state.credentials()?,
                )
                .await?;
            }
            Stage::StapleApp => {
                tools.notarizer.staple(&paths.app).await?;
                fs::remove_file(&paths.zip).await?;
            }
            Stage::DiskImage => {
                let staging = stage_disk_image(paths).await?;
                tools
                    .archiver
                    .create_disk_image(self.project.name(), &staging, &paths.dmg)
                    .await?;
            }
            Stage::SignDiskImage => tools.signer.sign_disk_image(&paths.dmg).await?,
            Stage::NotarizeDiskImage => {
                notarize(
                    tools.notarizer.as_ref(),
                    &paths.dmg,
                    "DMG",
                    state.credentials()?,
                )
                .await?;
            }
            Stage::StapleDiskImage => tools.notarizer.staple(&paths.dmg).await?,
            Stage::LocateFeedTools => state.toolset = Some(tools.feed.locate()?),
            Stage::SignUpdate => {
                let key = SecretFile::create_in(
                    &self.secret_dir,
                    "sparkle",
                    SPARKLE_KEY_FILE,
                    &self.config.sparkle_private_key,
                )?;
                state.feed_key = Some(key);

                let signature = tools
                    .feed
                    .sign_update(state.toolset()?, state.feed_key()?.path(), &paths.dmg)
                    .await?;
                state.signature = Some(signature).filter(|s| !s.is_empty());
            }
            Stage::Publish => {
                fs::copy_file(&paths.dmg, &paths.release_dmg).await?;
                state.sha256 = Some(calculate_sha256(&paths.release_dmg).await?);
            }
            Stage::GenerateManifest => {
                let result = tools
                    .feed
                    .generate_appcast(
                        state.toolset()?,
                        state.feed_key()?.path(),
                        &paths.release_dir,
                        &paths.appcast,
                    )
                    .await;
                let closed = state.feed_key.take().map_or(Ok(()), SecretFile::close);
                if let Err(e) = &closed {
                    log::warn!("Failed to remove temporary secret: {e}");
                }
                result?;
                closed?;
            }
            Stage::Finish => fs::remove_file(&paths.entitlements).await?,
        }

        Ok(())
    }
}
