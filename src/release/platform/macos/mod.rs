//! macOS release tooling for the app bundle and its DMG.
//!
//! Each external tool sits behind a capability trait so the pipeline can be
//! exercised without Xcode, signing credentials or network access:
//!
//! | Trait | Real implementation | Tools |
//! |-------|---------------------|-------|
//! | [`AppBuilder`] | [`XcodeBuild`] | `xcodebuild` |
//! | [`Signer`] | [`Codesign`] | `codesign` |
//! | [`Notarizer`] | [`NotaryTool`] | `xcrun notarytool`, `xcrun stapler` |
//! | [`ArchiveBuilder`] | [`Hdiutil`] | `ditto`, `hdiutil` |
//! | [`FeedPublisher`] | [`SparkleCli`] | `sign_update`, `generate_appcast` |

pub mod app;
pub mod dmg;
pub mod entitlements;
pub mod notarize;
pub mod sign;
pub mod sparkle;
pub mod xcode;

pub use app::stage_app_bundle;
pub use dmg::{ArchiveBuilder, Hdiutil, stage_disk_image};
pub use entitlements::{RELEASE_ENTITLEMENTS, write_entitlements};
pub use notarize::{NotarizationResponse, Notarizer, NotaryCredentials, NotaryTool, notarize};
pub use sign::{Codesign, Signer, sign_sparkle_framework};
pub use sparkle::{FeedPublisher, SparkleCli, SparkleToolset, ToolsetSearch};
pub use xcode::{AppBuilder, XcodeBuild};
