//! Host tool availability checking.
//!
//! Looks tools up on PATH without running them, so a missing Xcode install is
//! reported before the first stage starts.

use crate::release::error::{Error, Result};

/// Tools the real toolchain invokes from PATH or a fixed location.
pub const HOST_TOOLS: [&str; 5] = ["xcodebuild", "xcrun", "codesign", "ditto", "hdiutil"];

/// Fails with every tool from `tools` that `which` cannot find.
pub fn check_host_tools(tools: &[&str]) -> Result<()> {
    let missing: Vec<String> = tools
        .iter()
        .filter(|tool| match which::which(tool) {
            Ok(path) => {
                log::debug!("Found {} at: {}", tool, path.display());
                false
            }
            Err(e) => {
                log::debug!("{} not found in PATH: {}", tool, e);
                true
            }
        })
        .map(|tool| tool.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingHostTool { tools: missing })
    }
}
