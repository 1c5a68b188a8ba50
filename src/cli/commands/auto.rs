//! Build followed by upload.

use super::binstar::execute_binstar;
use super::build::execute_build;
use crate::cli::RuntimeConfig;
use crate::config::CondaciConfig;
use crate::error::Result;
use std::path::Path;

/// Execute the `auto` command
///
/// The build pulls dev dependencies from the upload user's master channel.
/// PyPI is not part of `auto`; CI configs call `condaci pypi` separately.
pub(super) async fn execute_auto(
    recipe: &Path,
    settings: &CondaciConfig,
    config: &RuntimeConfig,
) -> Result<()> {
    execute_build(recipe, settings.hosting.user.as_deref(), settings, config).await?;
    config.success_println("Successfully built conda package, proceeding to upload");
    execute_binstar(recipe, settings, config).await?;
    Ok(())
}
