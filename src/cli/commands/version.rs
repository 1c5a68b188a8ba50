//! Print the resolved version.

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::version::VersionResolver;

/// Execute the `version` command
pub(super) async fn execute_version(config: &RuntimeConfig) -> Result<()> {
    let version = VersionResolver::for_checkout(config.checkout())
        .resolve()
        .await?;
    println!("{}", version);
    Ok(())
}
