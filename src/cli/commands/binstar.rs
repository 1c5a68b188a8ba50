//! Upload to the hosting channel, followed by retention purging.

use crate::ci::CiContext;
use crate::cli::RuntimeConfig;
use crate::conda::Miniconda;
use crate::config::CondaciConfig;
use crate::error::Result;
use crate::hosting::{AnacondaClient, UploadOutcome, Uploader};
use crate::platform::HostPlatform;
use crate::version::VersionResolver;
use std::path::Path;

/// Execute the `binstar` command
///
/// Missing credentials skip the upload rather than failing the build.
pub(super) async fn execute_binstar(
    recipe: &Path,
    settings: &CondaciConfig,
    config: &RuntimeConfig,
) -> Result<UploadOutcome> {
    config.section("Uploading to binstar");
    let hosting = &settings.hosting;

    let (Some(user), Some(key)) = (hosting.user.as_deref(), hosting.key.as_deref()) else {
        if hosting.key.is_none() {
            config.println("No binstar key provided");
        }
        if hosting.user.is_none() {
            config.println("No binstar user provided");
        }
        config.println("-> Unable to upload to binstar");
        return Ok(UploadOutcome::Skipped {
            reason: "missing binstar credentials".to_string(),
        });
    };

    let mc = Miniconda::resolve(settings.miniconda.clone(), HostPlatform::current()?)?;
    let api = AnacondaClient::new(&hosting.api_url, key)?;
    let ci = CiContext::detect(config.env());
    if let Some(provider) = ci.provider_name() {
        config.verbose_println(&format!("Running on {}", provider));
    }
    let resolver = VersionResolver::for_checkout(config.checkout());

    let outcome = Uploader::new(&mc, &api, &ci, &resolver, config.output())
        .upload_if_appropriate(user, key, hosting.channel.as_deref(), recipe)
        .await?;

    if let UploadOutcome::Uploaded { channel, removed } = &outcome {
        log::info!(
            "uploaded to {}/{} and removed {} superseded builds",
            user,
            channel,
            removed.len()
        );
    }
    Ok(outcome)
}
