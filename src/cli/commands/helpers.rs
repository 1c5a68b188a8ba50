//! Shared helper functions for command execution.

use crate::cli::RuntimeConfig;
use crate::conda::Miniconda;
use crate::config::CondaciConfig;
use crate::error::Result;
use crate::platform::Host;
use crate::version::{Version, VersionResolver};

/// Detect the host and locate the miniconda installation
pub(super) fn host_and_miniconda(
    settings: &CondaciConfig,
    config: &RuntimeConfig,
) -> Result<(Host, Miniconda)> {
    let host = Host::detect(config.env())?;
    let mc = Miniconda::resolve(settings.miniconda.clone(), host.platform)?;
    config.verbose_println(&format!(
        "Host is {:?} {} - miniconda at {}",
        host.platform,
        host.arch,
        mc.root().display()
    ));
    Ok((host, mc))
}

/// Resolve the checkout version, downgrading recoverable failures to a warning
pub(super) async fn advisory_version(config: &RuntimeConfig) -> Result<Option<Version>> {
    match VersionResolver::for_checkout(config.checkout())
        .resolve()
        .await
    {
        Ok(version) => {
            config.println(&format!("Version resolved to {}", version));
            Ok(Some(version))
        }
        Err(e) if e.is_recoverable() => {
            config.warning_println(&format!("Could not resolve the version: {}", e));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
