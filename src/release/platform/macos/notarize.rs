//! Notarization with `xcrun notarytool` and stapling with `xcrun stapler`.
//!
//! Both call sites (the zipped app and the disk image) go through
//! [`notarize`]: submit, wait for the verdict, parse it, and fail unless the
//! service answered `Accepted`. A client that exits non-zero is a command
//! failure; a client that exits zero with a non-`Accepted` status is a
//! verdict rejection.

use crate::release::{
    error::{Error, Result},
    process::{CommandRunner, CommandSpec},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The only status that counts as success.
pub const ACCEPTED: &str = "Accepted";

/// App Store Connect API key material for notarytool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotaryCredentials {
    /// On-disk `.p8` key file
    pub key_path: PathBuf,
    /// API key id
    pub key_id: String,
    /// Issuer id, only for Team API keys
    pub issuer: Option<String>,
}

impl NotaryCredentials {
    /// Arguments selecting the API key: `--key`, `--key-id` and, when set, `--issuer`.
    pub fn key_args(&self) -> Vec<String> {
        let mut args = vec![
            "--key".to_string(),
            self.key_path.display().to_string(),
            "--key-id".to_string(),
            self.key_id.clone(),
        ];
        if let Some(issuer) = &self.issuer {
            args.push("--issuer".to_string());
            args.push(issuer.clone());
        }
        args
    }

    /// Command an operator can run to fetch the log for `submission_id`.
    ///
    /// The key path is a placeholder: the real one is deleted by then.
    pub fn log_hint(&self, submission_id: &str) -> String {
        let mut hint = format!(
            "Fetch log: xcrun notarytool log {submission_id} --key \"/path/to/AuthKey.p8\" --key-id {}",
            self.key_id
        );
        if let Some(issuer) = &self.issuer {
            hint.push_str(&format!(" --issuer {issuer}"));
        }
        hint
    }
}

/// notarytool's JSON answer to `submit --wait --output-format json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotarizationResponse {
    /// Submission id
    #[serde(default)]
    pub id: Option<String>,
    /// Verdict, e.g. "Accepted" or "Invalid"
    #[serde(default)]
    pub status: Option<String>,
    /// Free-form message from the service
    #[serde(default)]
    pub message: Option<String>,
}

impl NotarizationResponse {
    /// Parses notarytool output.
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Whether the verdict is `Accepted`.
    pub fn is_accepted(&self) -> bool {
        self.status.as_deref() == Some(ACCEPTED)
    }
}

/// Submits artifacts for notarization and staples tickets.
#[async_trait]
pub trait Notarizer: Send + Sync {
    /// Uploads `artifact`, waits for the verdict and returns notarytool's raw
    /// JSON output. A non-zero client exit is an error.
    async fn submit(&self, artifact: &Path, credentials: &NotaryCredentials) -> Result<String>;

    /// Attaches the notarization ticket to `artifact`.
    async fn staple(&self, artifact: &Path) -> Result<()>;
}

/// [`Notarizer`] backed by `xcrun notarytool` / `xcrun stapler`.
pub struct NotaryTool {
    runner: Arc<dyn CommandRunner>,
}

impl NotaryTool {
    /// Creates a notarizer that runs through `runner`.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

/// `xcrun notarytool submit <artifact> <key args> --wait --output-format json`
pub fn submit_command(artifact: &Path, credentials: &NotaryCredentials) -> CommandSpec {
    CommandSpec::new("xcrun")
        .args(["notarytool", "submit"])
        .arg(artifact)
        .args(credentials.key_args())
        .args(["--wait", "--output-format", "json"])
        .quiet()
}

/// `xcrun stapler staple <artifact>`
pub fn staple_command(artifact: &Path) -> CommandSpec {
    CommandSpec::new("xcrun").args(["stapler", "staple"]).arg(artifact)
}

#[async_trait]
impl Notarizer for NotaryTool {
    async fn submit(&self, artifact: &Path, credentials: &NotaryCredentials) -> Result<String> {
        log::info!(
            "Submitting {} for notarization (waiting for verdict)",
            artifact.display()
        );
        let result = self
            .runner
            .run(&submit_command(artifact, credentials))
            .await?;
        Ok(result.stdout_text())
    }

    async fn staple(&self, artifact: &Path) -> Result<()> {
        log::info!("Stapling {}", artifact.display());
        self.runner.run(&staple_command(artifact)).await?;
        Ok(())
    }
}

/// Notarizes `artifact` and checks the verdict.
///
/// `label` names the artifact in messages ("app zip", "DMG").
pub async fn notarize(
    notarizer: &dyn Notarizer,
    artifact: &Path,
    label: &str,
    credentials: &NotaryCredentials,
) -> Result<NotarizationResponse> {
    let output = notarizer.submit(artifact, credentials).await?;
    echo_response(&mut std::io::stdout().lock(), &output);
    interpret_verdict(&output, label, credentials)
}

/// Prints notarytool's JSON answer for the operator.
fn echo_response(out: &mut impl Write, output: &str) {
    if !output.is_empty() {
        // Best effort, like the process echo
        let _ = writeln!(out, "{output}");
    }
}

/// Turns notarytool's output into a verdict.
pub fn interpret_verdict(
    output: &str,
    label: &str,
    credentials: &NotaryCredentials,
) -> Result<NotarizationResponse> {
    let malformed = |reason: String| Error::MalformedNotarization {
        label: label.to_string(),
        reason,
    };

    if output.trim().is_empty() {
        return Err(malformed("notarytool printed nothing".to_string()));
    }

    let response =
        NotarizationResponse::parse(output).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

    let status = response.status.clone();
    match status.as_deref() {
        Some(ACCEPTED) => {
            log::info!("✓ Notarization accepted for {label}");
            Ok(response)
        }
        Some(status) => Err(Error::NotarizationRejected {
            label: label.to_string(),
            status: status.to_string(),
            hint: response.id.as_deref().map(|id| credentials.log_hint(id)),
            id: response.id,
        }),
        None => Err(malformed("response has no status".to_string())),
    }
}
