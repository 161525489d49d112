//! Entitlements applied to the distributed app.

use crate::release::error::{ErrorExt, Result};
use std::path::Path;

/// App sandbox plus read-only access to user-selected files.
pub const RELEASE_ENTITLEMENTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>com.apple.security.app-sandbox</key>
  <true/>
  <key>com.apple.security.files.user-selected.read-only</key>
  <true/>
</dict>
</plist>
"#;

/// Writes [`RELEASE_ENTITLEMENTS`] to `path`, replacing any previous file.
pub async fn write_entitlements(path: &Path) -> Result<()> {
    tokio::fs::write(path, RELEASE_ENTITLEMENTS)
        .await
        .fs_context("writing entitlements", path)
}
