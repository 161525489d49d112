//! Xcode project coordinates.

use std::path::{Path, PathBuf};

/// Project name used when none is given.
pub const DEFAULT_PROJECT_NAME: &str = "char";
/// Build configuration used when none is given.
pub const DEFAULT_CONFIGURATION: &str = "Release";
/// Build destination used when none is given.
pub const DEFAULT_DESTINATION: &str = "platform=macOS,arch=arm64";

/// Which project to build and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    root: PathBuf,
    name: String,
    scheme: String,
    configuration: String,
    destination: String,
}

impl ProjectSettings {
    /// Settings for `name` rooted at `root`, with scheme = name and the default
    /// configuration and destination.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            root: root.into(),
            scheme: name.clone(),
            name,
            configuration: DEFAULT_CONFIGURATION.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
        }
    }

    /// Overrides the scheme.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Overrides the build configuration.
    pub fn configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = configuration.into();
        self
    }

    /// Overrides the build destination.
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    /// Project root (the directory holding `<name>.xcodeproj`).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Product and project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Xcode scheme.
    pub fn scheme_name(&self) -> &str {
        &self.scheme
    }

    /// Xcode build configuration.
    pub fn configuration_name(&self) -> &str {
        &self.configuration
    }

    /// xcodebuild `-destination` value.
    pub fn destination_spec(&self) -> &str {
        &self.destination
    }

    /// `<name>.xcodeproj`
    pub fn xcodeproj(&self) -> String {
        format!("{}.xcodeproj", self.name)
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self::new(".", DEFAULT_PROJECT_NAME)
    }
}
