//! Scoped storage for secret material written to disk.
//!
//! notarytool and Sparkle's tools only accept keys as files. A [`SecretFile`]
//! writes the key into a freshly created, uniquely named directory and
//! removes the whole directory when dropped, so the key is gone on every exit
//! path, including early returns through `?`.

use crate::release::error::{ErrorExt, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A secret written to a private temporary directory.
#[derive(Debug)]
pub struct SecretFile {
    dir: TempDir,
    path: PathBuf,
}

impl SecretFile {
    /// Writes `contents` to `<base>/<prefix>-XXXXXX/<file_name>`.
    ///
    /// On Unix the directory is 0700 and the file 0600.
    pub fn create_in(
        base: impl AsRef<Path>,
        prefix: &str,
        file_name: &str,
        contents: &str,
    ) -> Result<Self> {
        let base = base.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(&format!("{prefix}-"))
            .tempdir_in(base)
            .fs_context("creating temporary directory in", base)?;
        let path = dir.path().join(file_name);

        write_private(&path, contents)?;
        log::debug!("Wrote temporary secret to {}", path.display());

        Ok(Self { dir, path })
    }

    /// Path of the secret file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the secret.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Deletes the secret now, reporting any failure.
    ///
    /// Dropping also deletes it, but silently.
    pub fn close(self) -> Result<()> {
        let dir = self.dir.path().to_path_buf();
        self.dir
            .close()
            .fs_context("removing temporary secret directory", &dir)
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
        .fs_context("creating secret file", path)?;
    file.write_all(contents.as_bytes())
        .fs_context("writing secret file", path)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).fs_context("writing secret file", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_removed_on_drop() {
        let base = tempfile::tempdir().unwrap();
        let (file, dir) = {
            let secret = SecretFile::create_in(base.path(), "notary", "AuthKey.p8", "KEY").unwrap();
            assert_eq!(std::fs::read_to_string(secret.path()).unwrap(), "KEY");
            (secret.path().to_path_buf(), secret.dir().to_path_buf())
        };
        assert!(!file.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn secret_is_removed_when_scope_exits_with_error() {
        let base = tempfile::tempdir().unwrap();
        let mut seen = None;
        let mut attempt = || -> Result<()> {
            let secret = SecretFile::create_in(base.path(), "sparkle", "key", "k")?;
            seen = Some(secret.path().to_path_buf());
            crate::bail!("sign_update exploded");
        };
        let outcome = attempt();
        assert!(outcome.is_err());
        assert!(!seen.unwrap().exists());
    }

    #[test]
    fn directories_are_unique() {
        let base = tempfile::tempdir().unwrap();
        let a = SecretFile::create_in(base.path(), "notary", "AuthKey.p8", "a").unwrap();
        let b = SecretFile::create_in(base.path(), "notary", "AuthKey.p8", "b").unwrap();
        assert_ne!(a.dir(), b.dir());
        assert!(a.dir().file_name().unwrap().to_string_lossy().starts_with("notary-"));
        a.close().unwrap();
        b.close().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn secret_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let base = tempfile::tempdir().unwrap();
        let secret = SecretFile::create_in(base.path(), "notary", "AuthKey.p8", "k").unwrap();
        let mode = std::fs::metadata(secret.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
