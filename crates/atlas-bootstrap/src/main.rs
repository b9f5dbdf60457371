//! Headless entrypoint for the Atlas viewer.
//!
//! Delegates to [`atlas_bootstrap::run_viewer`] on a single-threaded runtime.

use std::io::{self, Write};
use std::process::ExitCode;

use atlas_bootstrap::LaunchError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match atlas_bootstrap::run_viewer().await {
        Ok(()) => ExitCode::SUCCESS,
        // Already reported on the splash screen and in the logs.
        Err(LaunchError::Bootstrap(_)) => ExitCode::FAILURE,
        Err(error) => {
            writeln!(io::stderr().lock(), "atlas: {error}").ok();
            ExitCode::FAILURE
        }
    }
}
