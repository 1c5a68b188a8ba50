//! condaci - conda package CI release helper.
//!
//! Sets up miniconda, builds recipes and uploads the results to Binstar and
//! PyPI from Travis CI and AppVeyor.

use condaci::cli;
use condaci::cli::OutputManager;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Retention skips and version fallbacks are reported at warn level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Create output manager for error display (never quiet for fatal errors)
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
