//! Source distribution upload.

use super::helpers::host_and_miniconda;
use crate::cli::RuntimeConfig;
use crate::config::CondaciConfig;
use crate::error::Result;
use crate::publish::PypiPublisher;
use crate::version::VersionResolver;

/// Execute the `pypi` command, returning whether anything was uploaded
pub(super) async fn execute_pypi(settings: &CondaciConfig, config: &RuntimeConfig) -> Result<bool> {
    config.section("Uploading to PyPI");
    let (host, mc) = host_and_miniconda(settings, config)?;
    let resolver = VersionResolver::for_checkout(config.checkout());

    PypiPublisher::new(&mc, host, &resolver, config.output())
        .upload_if_appropriate(
            settings.pypi.user.as_deref(),
            settings.pypi.password.as_deref(),
            config.checkout(),
        )
        .await
}
