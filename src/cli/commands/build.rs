//! `conda build` step.

use super::helpers::{advisory_version, host_and_miniconda};
use crate::cli::RuntimeConfig;
use crate::conda::{BuildRequest, build_package};
use crate::config::CondaciConfig;
use crate::error::Result;
use std::path::Path;

/// Execute the `build` command
///
/// `channel_owner` is the hosting user whose master channel supplies dev
/// dependencies; plain `build` has none.
pub(super) async fn execute_build(
    recipe: &Path,
    channel_owner: Option<&str>,
    settings: &CondaciConfig,
    config: &RuntimeConfig,
) -> Result<()> {
    config.section("Building conda package");
    let (host, mc) = host_and_miniconda(settings, config)?;

    config.println("Attempting to resolve version for the build environment");
    let version = advisory_version(config).await?;

    let request = BuildRequest {
        recipe,
        version: version.as_ref(),
        channel_owner,
        arch: host.arch,
    };
    build_package(&mc, &request, config.output()).await
}
