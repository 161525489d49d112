//! Sparkle toolset discovery.
//!
//! Locates `sign_update` and `generate_appcast` by probing, in order: an
//! explicit override directory, `~/.local/bin`, then each Homebrew cask
//! root's installed versions, newest first.

use crate::release::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Homebrew cask roots, Apple silicon first.
pub const CASK_ROOTS: [&str; 2] = ["/opt/homebrew/Caskroom/sparkle", "/usr/local/Caskroom/sparkle"];

/// Paths to the two Sparkle executables the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparkleToolset {
    /// `sign_update`
    pub sign_update: PathBuf,
    /// `generate_appcast`
    pub generate_appcast: PathBuf,
}

impl SparkleToolset {
    /// Toolset rooted at `bin_dir`, without checking that it exists.
    pub fn in_dir(bin_dir: &Path) -> Self {
        Self {
            sign_update: bin_dir.join("sign_update"),
            generate_appcast: bin_dir.join("generate_appcast"),
        }
    }

    fn is_complete(&self) -> bool {
        is_executable(&self.sign_update) && is_executable(&self.generate_appcast)
    }
}

/// Where to look for Sparkle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsetSearch {
    override_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    cask_roots: Vec<PathBuf>,
}

impl ToolsetSearch {
    /// Search with an optional override, the user's home and the standard cask roots.
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        Self {
            override_dir,
            home_dir: dirs::home_dir(),
            cask_roots: CASK_ROOTS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replaces the home directory probed for `.local/bin`.
    pub fn home_dir(mut self, home: Option<PathBuf>) -> Self {
        self.home_dir = home;
        self
    }

    /// Replaces the cask roots.
    pub fn cask_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.cask_roots = roots;
        self
    }

    /// Candidate bin directories in probe order.
    ///
    /// Versions under each cask root are sorted descending by name; roots
    /// that cannot be read are skipped.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(dir) = &self.override_dir {
            candidates.push(dir.clone());
        }
        if let Some(home) = &self.home_dir {
            candidates.push(home.join(".local/bin"));
        }

        for root in &self.cask_roots {
            let Ok(entries) = std::fs::read_dir(root) else {
                log::debug!("Sparkle cask root not present: {}", root.display());
                continue;
            };
            let mut versions: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| root.join(e.file_name()).join("bin"))
                .collect();
            versions.sort();
            versions.reverse();
            candidates.extend(versions);
        }

        candidates
    }

    /// First candidate holding both executables.
    pub fn locate(&self) -> Result<SparkleToolset> {
        let candidates = self.candidates();
        for candidate in &candidates {
            let toolset = SparkleToolset::in_dir(candidate);
            if toolset.is_complete() {
                log::info!("✓ Sparkle tools found in {}", candidate.display());
                return Ok(toolset);
            }
            log::debug!("No Sparkle tools in {}", candidate.display());
        }
        Err(Error::MissingToolset {
            searched: candidates,
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
