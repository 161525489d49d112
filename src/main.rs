//! char-release - release pipeline for the char macOS app.
//!
//! Builds, signs, notarizes and packages the app, then publishes the DMG and
//! Sparkle appcast. Exit code 0 means both deliverables are in build/release.

use char_release::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging; stage progress is shown unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for line in e.recovery_suggestions() {
                println!("{line}");
            }
            1
        }
    };

    process::exit(exit_code);
}
