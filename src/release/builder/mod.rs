//! Release orchestration and coordination.
//!
//! This module provides the [`ReleasePipeline`] that runs the release stages
//! against a [`Toolchain`] of external tools.
//!
//! # Example
//!
//! ```no_run
//! use char_release::release::{
//!     ProjectSettings, ReleaseConfig, ReleasePipeline, Toolchain, ToolsetSearch,
//! };
//!
//! # async fn example() -> char_release::release::Result<()> {
//! let config = ReleaseConfig::from_env()?;
//! let toolchain = Toolchain::system(&config.signing_identity, ToolsetSearch::new(None));
//! let pipeline = ReleasePipeline::new(config, ProjectSettings::default(), toolchain);
//!
//! let report = pipeline.run().await?;
//! println!("Published {} ({})", report.dmg.display(), report.sha256);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA-256 of the published DMG
//! - [`orchestrator`] - [`ReleasePipeline`] and its per-run state
//! - [`stage`] - the ordered [`Stage`] list
//! - [`tool_detection`] - host tool availability checking
//! - [`toolchain`] - the capability implementations a run uses

mod checksum;
mod orchestrator;
mod stage;
mod tool_detection;
mod toolchain;

pub use checksum::calculate_sha256;
pub use orchestrator::{ReleasePipeline, ReleaseReport};
pub use stage::Stage;
pub use tool_detection::{HOST_TOOLS, check_host_tools};
pub use toolchain::Toolchain;
