//! The ordered release stages.

use std::fmt;

/// One step of the release pipeline.
///
/// [`Stage::ALL`] is the execution order; there are no branches that rejoin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Create output directories and write the notarization key
    Prepare,
    /// xcodebuild
    Build,
    /// Copy the build output to the stable app path
    StageApp,
    /// Write the entitlements plist
    Entitlements,
    /// Sign Sparkle's nested executables, XPC services and framework
    SignNested,
    /// Sign the app bundle with entitlements
    SignApp,
    /// Zip the app for notarization
    Zip,
    /// Notarize the app zip
    NotarizeZip,
    /// Staple the app and drop the zip
    StapleApp,
    /// Stage and create the DMG
    DiskImage,
    /// Sign the DMG
    SignDiskImage,
    /// Notarize the DMG
    NotarizeDiskImage,
    /// Staple the DMG
    StapleDiskImage,
    /// Find Sparkle's tools
    LocateFeedTools,
    /// EdDSA-sign the DMG for the update feed
    SignUpdate,
    /// Copy the DMG into the release directory
    Publish,
    /// Regenerate appcast.xml
    GenerateManifest,
    /// Remove intermediate files
    Finish,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 18] = [
        Stage::Prepare,
        Stage::Build,
        Stage::StageApp,
        Stage::Entitlements,
        Stage::SignNested,
        Stage::SignApp,
        Stage::Zip,
        Stage::NotarizeZip,
        Stage::StapleApp,
        Stage::DiskImage,
        Stage::SignDiskImage,
        Stage::NotarizeDiskImage,
        Stage::StapleDiskImage,
        Stage::LocateFeedTools,
        Stage::SignUpdate,
        Stage::Publish,
        Stage::GenerateManifest,
        Stage::Finish,
    ];

    /// Short description for progress output.
    pub fn description(self) -> &'static str {
        match self {
            Stage::Prepare => "Preparing build directories",
            Stage::Build => "Building app",
            Stage::StageApp => "Staging app bundle",
            Stage::Entitlements => "Writing entitlements",
            Stage::SignNested => "Signing Sparkle components",
            Stage::SignApp => "Signing app bundle",
            Stage::Zip => "Zipping app",
            Stage::NotarizeZip => "Notarizing app zip",
            Stage::StapleApp => "Stapling app",
            Stage::DiskImage => "Creating DMG",
            Stage::SignDiskImage => "Signing DMG",
            Stage::NotarizeDiskImage => "Notarizing DMG",
            Stage::StapleDiskImage => "Stapling DMG",
            Stage::LocateFeedTools => "Locating Sparkle tools",
            Stage::SignUpdate => "Signing update",
            Stage::Publish => "Publishing DMG",
            Stage::GenerateManifest => "Generating appcast",
            Stage::Finish => "Cleaning up",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notarization_precedes_stapling_and_publishing() {
        let pos = |s| Stage::ALL.iter().position(|x| *x == s).unwrap();
        assert!(pos(Stage::SignNested) < pos(Stage::SignApp));
        assert!(pos(Stage::NotarizeZip) < pos(Stage::StapleApp));
        assert!(pos(Stage::StapleApp) < pos(Stage::DiskImage));
        assert!(pos(Stage::SignDiskImage) < pos(Stage::NotarizeDiskImage));
        assert!(pos(Stage::StapleDiskImage) < pos(Stage::SignUpdate));
        assert!(pos(Stage::Publish) < pos(Stage::GenerateManifest));
        assert_eq!(Stage::ALL[0], Stage::Prepare);
    }
}
