//! Disk image staging and the archive tool invocations.

use crate::release::{
    error::{Context, Result},
    process::CommandSpec,
    settings::ReleasePaths,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Prepares `paths.dmg_staging` with a copy of the signed app and nothing else.
///
/// The staging folder is erased first; leftovers from an earlier run would
/// otherwise end up inside the image.
pub async fn stage_disk_image(paths: &ReleasePaths) -> Result<PathBuf> {
    fs::create_dir_all(&paths.dmg_staging, true).await?;

    let staged_app = paths.dmg_staging.join(paths.app_file_name());
    log::debug!("Copying .app to staging: {}", staged_app.display());
    fs::copy_dir(&paths.app, &staged_app)
        .await
        .with_context(|| {
            format!(
                "copying .app bundle to staging directory: {}",
                staged_app.display()
            )
        })?;

    Ok(paths.dmg_staging.clone())
}

/// `/usr/bin/ditto -c -k --keepParent <app> <zip>`
pub fn zip_command(app: &Path, zip: &Path) -> CommandSpec {
    CommandSpec::new("/usr/bin/ditto")
        .args(["-c", "-k", "--keepParent"])
        .arg(app)
        .arg(zip)
}

/// `hdiutil create -volname <name> -srcfolder <dir> -ov -format UDZO <dmg>`
pub fn create_dmg_command(volume_name: &str, source_dir: &Path, dmg: &Path) -> CommandSpec {
    CommandSpec::new("hdiutil")
        .args(["create", "-volname", volume_name, "-srcfolder"])
        .arg(source_dir)
        .args([
            "-ov", // Overwrite if exists
            "-format", "UDZO",
        ])
        .arg(dmg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::settings::ProjectSettings;

    #[tokio::test]
    async fn staging_holds_only_the_app() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ReleasePaths::new(&ProjectSettings::new(tmp.path(), "char"));
        std::fs::create_dir_all(paths.app.join("Contents/MacOS")).unwrap();
        std::fs::write(paths.app.join("Contents/MacOS/char"), "bin").unwrap();
        std::fs::create_dir_all(&paths.dmg_staging).unwrap();
        std::fs::write(paths.dmg_staging.join("leftover.txt"), "x").unwrap();

        let staging = stage_disk_image(&paths).await.unwrap();
        stage_disk_image(&paths).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(&staging)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("char.app")]);
        assert!(staging.join("char.app/Contents/MacOS/char").is_file());
    }

    #[test]
    fn dmg_is_compressed_and_overwritten() {
        let cmd = create_dmg_command("char", Path::new("build/dmg"), Path::new("build/char.dmg"));
        assert_eq!(
            cmd.args_lossy(),
            vec![
                "create",
                "-volname",
                "char",
                "-srcfolder",
                "build/dmg",
                "-ov",
                "-format",
                "UDZO",
                "build/char.dmg",
            ]
        );
    }

    #[test]
    fn zip_keeps_parent_directory() {
        let cmd = zip_command(Path::new("build/char.app"), Path::new("build/char.zip"));
        assert_eq!(cmd.display_name(), "ditto");
        assert_eq!(
            cmd.args_lossy(),
            vec!["-c", "-k", "--keepParent", "build/char.app", "build/char.zip"]
        );
    }
}
