//! Artifact locations derived from the project settings.

use super::ProjectSettings;
use std::path::{Path, PathBuf};

/// File name of the update-feed manifest.
pub const APPCAST_FILE: &str = "appcast.xml";
/// File name of the materialized entitlements.
pub const ENTITLEMENTS_FILE: &str = "release-entitlements.plist";

/// Every filesystem location the pipeline reads or writes.
///
/// All paths are computed up front from the project root and name; nothing
/// here touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePaths {
    /// `build/`
    pub build_dir: PathBuf,
    /// `build/DerivedData`
    pub derived_data: PathBuf,
    /// xcodebuild output: `build/DerivedData/Build/Products/<configuration>/<name>.app`
    pub built_app: PathBuf,
    /// Stable signed bundle: `build/<name>.app`
    pub app: PathBuf,
    /// Notarization upload: `build/<name>.zip`
    pub zip: PathBuf,
    /// Disk image: `build/<name>.dmg`
    pub dmg: PathBuf,
    /// Disk image staging folder: `build/dmg`
    pub dmg_staging: PathBuf,
    /// `build/release-entitlements.plist`
    pub entitlements: PathBuf,
    /// Published deliverables: `build/release`
    pub release_dir: PathBuf,
    /// `build/release/<name>.dmg`
    pub release_dmg: PathBuf,
    /// `build/release/appcast.xml`
    pub appcast: PathBuf,
}

impl ReleasePaths {
    /// Derives all paths for `project`.
    pub fn new(project: &ProjectSettings) -> Self {
        let name = project.name();
        let build_dir = project.root().join("build");
        let derived_data = build_dir.join("DerivedData");
        let built_app = derived_data
            .join("Build/Products")
            .join(project.configuration_name())
            .join(format!("{name}.app"));
        let release_dir = build_dir.join("release");

        Self {
            app: build_dir.join(format!("{name}.app")),
            zip: build_dir.join(format!("{name}.zip")),
            dmg: build_dir.join(format!("{name}.dmg")),
            dmg_staging: build_dir.join("dmg"),
            entitlements: build_dir.join(ENTITLEMENTS_FILE),
            release_dmg: release_dir.join(format!("{name}.dmg")),
            appcast: release_dir.join(APPCAST_FILE),
            release_dir,
            built_app,
            derived_data,
            build_dir,
        }
    }

    /// Name of the app bundle directory (`<name>.app`).
    pub fn app_file_name(&self) -> &Path {
        Path::new(self.app.file_name().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_derived_from_root_and_name() {
        let project = ProjectSettings::new("/work/char", "char");
        let paths = ReleasePaths::new(&project);
        assert_eq!(paths.build_dir, PathBuf::from("/work/char/build"));
        assert_eq!(
            paths.built_app,
            PathBuf::from("/work/char/build/DerivedData/Build/Products/Release/char.app")
        );
        assert_eq!(paths.app, PathBuf::from("/work/char/build/char.app"));
        assert_eq!(paths.zip, PathBuf::from("/work/char/build/char.zip"));
        assert_eq!(paths.dmg, PathBuf::from("/work/char/build/char.dmg"));
        assert_eq!(paths.dmg_staging, PathBuf::from("/work/char/build/dmg"));
        assert_eq!(paths.release_dmg, PathBuf::from("/work/char/build/release/char.dmg"));
        assert_eq!(paths.appcast, PathBuf::from("/work/char/build/release/appcast.xml"));
        assert_eq!(paths.app_file_name(), Path::new("char.app"));
    }

    #[test]
    fn configuration_selects_products_folder() {
        let project = ProjectSettings::new("/w", "char").configuration("Debug");
        let paths = ReleasePaths::new(&project);
        assert!(paths.built_app.ends_with("Build/Products/Debug/char.app"));
    }
}
