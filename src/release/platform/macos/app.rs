//! Staging the built .app at its stable location.

use crate::release::{error::Result, settings::ReleasePaths, utils::fs};

/// Copies xcodebuild's output to `paths.app`.
///
/// The build output must exist and be a directory. Any app bundle, zip or
/// disk image left by a previous run is removed first, so a re-run leaves
/// exactly one fresh bundle behind.
pub async fn stage_app_bundle(paths: &ReleasePaths) -> Result<()> {
    fs::ensure_dir(&paths.built_app, "Built app").await?;

    fs::remove_file(&paths.dmg).await?;
    fs::remove_file(&paths.zip).await?;

    log::info!(
        "Staging {} -> {}",
        paths.built_app.display(),
        paths.app.display()
    );
    fs::replace_dir(&paths.built_app, &paths.app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::settings::ProjectSettings;

    #[tokio::test]
    async fn missing_build_output_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ReleasePaths::new(&ProjectSettings::new(tmp.path(), "char"));
        let err = stage_app_bundle(&paths).await.unwrap_err();
        assert!(err.to_string().contains("Built app not found"));
    }

    #[tokio::test]
    async fn stale_zip_and_dmg_are_cleared() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ReleasePaths::new(&ProjectSettings::new(tmp.path(), "char"));
        std::fs::create_dir_all(paths.built_app.join("Contents")).unwrap();
        std::fs::write(&paths.zip, "old zip").unwrap();
        std::fs::write(&paths.dmg, "old dmg").unwrap();

        stage_app_bundle(&paths).await.unwrap();

        assert!(paths.app.join("Contents").is_dir());
        assert!(!paths.zip.exists());
        assert!(!paths.dmg.exists());
    }

    #[tokio::test]
    async fn previous_bundle_is_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ReleasePaths::new(&ProjectSettings::new(tmp.path(), "char"));
        std::fs::create_dir_all(paths.built_app.join("Contents/MacOS")).unwrap();
        std::fs::write(paths.built_app.join("Contents/MacOS/char"), "new").unwrap();
        std::fs::create_dir_all(paths.app.join("Contents")).unwrap();
        std::fs::write(paths.app.join("Contents/stale"), "old").unwrap();

        stage_app_bundle(&paths).await.unwrap();

        assert!(!paths.app.join("Contents/stale").exists());
        assert_eq!(
            std::fs::read_to_string(paths.app.join("Contents/MacOS/char")).unwrap(),
            "new"
        );
    }
}
