//! Miniconda provisioning.

use super::helpers::host_and_miniconda;
use crate::cli::RuntimeConfig;
use crate::conda::{
    PythonVersion, WINDOWS_ENV_SCRIPT_PATH, WINDOWS_ENV_SCRIPT_URL, download_file, setup_miniconda,
};
use crate::config::CondaciConfig;
use crate::error::Result;
use std::path::Path;

/// Execute the `setup` command
pub(super) async fn execute_setup(
    python: PythonVersion,
    channel: Option<&str>,
    settings: &CondaciConfig,
    config: &RuntimeConfig,
) -> Result<()> {
    config.section("Setting up miniconda");
    let (host, mc) = host_and_miniconda(settings, config)?;
    setup_miniconda(python, &mc, host, channel, config.output()).await?;

    if host.platform.is_windows() {
        config.println(&format!(
            "Downloading Windows SDK helper to {}",
            WINDOWS_ENV_SCRIPT_PATH
        ));
        download_file(WINDOWS_ENV_SCRIPT_URL, Path::new(WINDOWS_ENV_SCRIPT_PATH)).await?;
    }
    Ok(())
}
