//! Command line interface for the release pipeline.
//!
//! Parses arguments, validates the whole configuration before anything is
//! spawned, then runs the pipeline and reports its deliverables.

mod args;

pub use args::Args;

use crate::error::{CliError, Result};
use crate::release::{
    ReleaseConfig, ReleasePipeline, ReleasePaths, Stage, Toolchain, ToolsetSearch,
    builder::{HOST_TOOLS, check_host_tools},
    platform::macos::sparkle::normalize_override,
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args, ReleaseConfig::from_env).await
}

/// Runs the command described by `args`, reading secrets through `load_config`.
pub async fn execute<F>(args: &Args, load_config: F) -> Result<i32>
where
    F: FnOnce() -> crate::release::Result<ReleaseConfig>,
{
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let config = load_config()?;
    let project = args
        .project_settings()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let search = ToolsetSearch::new(args.sparkle_bin.clone().map(normalize_override));

    if !args.skip_preflight {
        check_host_tools(&HOST_TOOLS)?;
    }

    if args.dry_run {
        print_plan(&ReleasePaths::new(&project), &search);
        return Ok(0);
    }

    let toolchain = Toolchain::system(&config.signing_identity, search);
    let pipeline = ReleasePipeline::new(config, project, toolchain);
    let report = pipeline.run().await?;

    if let Some(signature) = &report.signature {
        println!("Signature: {signature}");
    }
    println!(
        "Release artifacts ready in {}",
        pipeline.paths().release_dir.display()
    );
    println!("- {}", file_name(&report.dmg));
    println!("- {}", file_name(&report.appcast));
    println!("SHA-256 ({}): {}", file_name(&report.dmg), report.sha256);

    Ok(0)
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_plan(paths: &ReleasePaths, search: &ToolsetSearch) {
    println!("Configuration OK. Stages:");
    for (index, stage) in Stage::ALL.iter().enumerate() {
        println!("  {:>2}. {}", index + 1, stage);
    }
    println!("App bundle: {}", paths.app.display());
    println!("DMG:        {}", paths.release_dmg.display());
    println!("Appcast:    {}", paths.appcast.display());
    match search.locate() {
        Ok(tools) => println!("Sparkle:    {}", tools.sign_update.display()),
        Err(e) => println!("Sparkle:    {e}"),
    }
}
