//! Platform-specific release tooling.

pub mod macos;
