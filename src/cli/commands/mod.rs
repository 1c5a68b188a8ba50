//! Command execution functions for the CI steps.
//!
//! Each subcommand maps to one executor; `auto` chains build and binstar.

mod auto;
mod binstar;
mod build;
mod helpers;
mod pypi;
mod setup;
mod version;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use auto::execute_auto;
use binstar::execute_binstar;
use build::execute_build;
use pypi::execute_pypi;
use setup::execute_setup;
use version::execute_version;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        // Create output for validation errors (never quiet)
        let output = super::OutputManager::new(false, false);
        output.error(&validation_error.to_string());
        return Ok(1);
    }

    let config = RuntimeConfig::from(&args);
    let settings = args.command.config(config.env());

    let result = match &args.command {
        Command::Setup {
            python, channel, ..
        } => execute_setup(*python, channel.as_deref(), &settings, &config).await,
        Command::Build { build, .. } => {
            execute_build(&build.buildpath, None, &settings, &config).await
        }
        Command::Binstar { build, .. } => execute_binstar(&build.buildpath, &settings, &config)
            .await
            .map(|_| ()),
        Command::Pypi { .. } => execute_pypi(&settings, &config).await.map(|_| ()),
        Command::Auto { build, .. } => execute_auto(&build.buildpath, &settings, &config).await,
        Command::Version => execute_version(&config).await,
    };

    match result {
        Ok(()) => {
            // `version` output is consumed by scripts
            if !config.is_quiet() && !matches!(args.command, Command::Version) {
                config.success_println(&format!(
                    "Command '{}' completed successfully",
                    args.command.name()
                ));
            }
            Ok(0)
        }
        Err(e) => {
            config.error_println(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e
            ));

            if config.is_verbose() {
                let suggestions = e.recovery_suggestions();
                if !suggestions.is_empty() {
                    config.println("\n💡 Recovery suggestions:");
                    for suggestion in suggestions {
                        config.println(&format!("  • {}", suggestion));
                    }
                }
            }

            Ok(1)
        }
    }
}
