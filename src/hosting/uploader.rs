//! Upload routing and post-upload purging.

use super::HostingApi;
use crate::artifact::{ArtifactRecord, LocalArtifact};
use crate::ci::CiContext;
use crate::cli::OutputManager;
use crate::conda::{Miniconda, build_output_path};
use crate::error::Result;
use crate::process::{ToolCommand, execute};
use crate::retention::{Channel, RetentionPolicy, parse_hosted};
use crate::version::{ReleaseKind, TagDescriber, Version, VersionResolver};
use std::path::Path;

/// Label shown in place of the API key
const KEY_PLACEHOLDER: &str = "BINSTAR_KEY";

/// What an upload attempt ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing uploaded
    Skipped {
        /// Why the upload was skipped
        reason: String,
    },
    /// Uploaded, and possibly purged older builds
    Uploaded {
        /// Destination channel
        channel: Channel,
        /// Records deleted by retention
        removed: Vec<ArtifactRecord>,
    },
}

/// Channel for an upload: explicit choice, else `main` for releases, else the CI branch
pub fn resolve_channel(explicit: Option<&str>, version: &Version, ci: &CiContext) -> Result<Channel> {
    if let Some(name) = explicit {
        return Ok(Channel::new(name));
    }
    let kind = version.kind();
    if kind == ReleaseKind::Release {
        log::info!("current head is a tagged release ({}), uploading to 'main'", version);
        return Ok(Channel::Main);
    }
    log::info!(
        "current head is a {} ({}) - using the CI branch as channel",
        kind,
        version
    );
    Ok(Channel::new(&ci.current_branch()?))
}

/// Upload a built package with the binstar CLI
pub async fn upload_file(
    mc: &Miniconda,
    key: &str,
    user: &str,
    channel: &Channel,
    path: &Path,
    output: &OutputManager,
) -> Result<()> {
    let _ = output.println(&format!("Uploading to {}/{}", user, channel));
    let cmd = ToolCommand::new(mc.binstar())
        .arg("-t")
        .secret(key, KEY_PLACEHOLDER)
        .args(["upload", "--force", "-u", user, "-c", channel.as_str()])
        .arg(path);
    execute(&cmd, output).await
}

/// Delete builds on `channel` superseded by the package at `path`
///
/// Returns the deleted records. Deletions run one at a time and stop at the
/// first failure.
pub async fn purge_old_files<A: HostingApi>(
    api: &A,
    user: &str,
    channel: &Channel,
    path: &Path,
    output: &OutputManager,
) -> Result<Vec<ArtifactRecord>> {
    let policy = RetentionPolicy::new(channel.clone());
    if !channel.is_purgeable() {
        let _ = output.println("On main channel - no purging of releases will be done.");
        return Ok(Vec::new());
    }

    let _ = output.println(&format!("Purging old releases from channel '{}'", channel));
    let new = LocalArtifact::from_path(path)?;
    let hosted = parse_hosted(&api.channel_files(user, channel.as_str()).await?);

    let _ = output.println("candidate releases with same name are:");
    for record in hosted.iter().filter(|r| r.name == new.name) {
        let _ = output.println(&record.all_info());
    }

    let to_remove = policy.removals(path, &hosted)?;
    let _ = output.println(&format!("Found {} releases to remove", to_remove.len()));
    for record in &to_remove {
        let _ = output.println(&format!("Removing '{}'", record));
        api.remove_file(record).await?;
    }
    Ok(to_remove)
}

/// Decides whether and where to upload, then uploads and purges
pub struct Uploader<'a, A, D> {
    mc: &'a Miniconda,
    api: &'a A,
    ci: &'a CiContext,
    resolver: &'a VersionResolver<D>,
    output: &'a OutputManager,
}

impl<'a, A: HostingApi, D: TagDescriber> Uploader<'a, A, D> {
    /// Uploader over its collaborators
    pub fn new(
        mc: &'a Miniconda,
        api: &'a A,
        ci: &'a CiContext,
        resolver: &'a VersionResolver<D>,
        output: &'a OutputManager,
    ) -> Self {
        Self {
            mc,
            api,
            ci,
            resolver,
            output,
        }
    }

    /// Upload the package built from `recipe` unless this is a pull request
    pub async fn upload_if_appropriate(
        &self,
        user: &str,
        key: &str,
        channel: Option<&str>,
        recipe: &Path,
    ) -> Result<UploadOutcome> {
        let _ = self.output.println(&format!(
            "Have a user ({}) and key - can upload if suitable",
            user
        ));

        if !self.ci.can_upload()? {
            let _ = self.output.println("Cannot upload to binstar - must be a PR.");
            return Ok(UploadOutcome::Skipped {
                reason: "pull request build".to_string(),
            });
        }

        let channel = match channel {
            Some(name) => Channel::new(name),
            None => {
                let _ = self.output.println(
                    "No upload channel provided - auto resolving channel based on release type and CI status",
                );
                let version = self.resolver.resolve().await?;
                resolve_channel(None, &version, self.ci)?
            }
        };
        let _ = self
            .output
            .println(&format!("Fit to upload to channel '{}'", channel));

        let path = build_output_path(self.mc, recipe).await?;
        upload_file(self.mc, key, user, &channel, &path, self.output).await?;
        let removed = purge_old_files(self.api, user, &channel, &path, self.output).await?;

        Ok(UploadOutcome::Uploaded { channel, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvConfig;
    use crate::error::CondaciError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        files: Vec<String>,
        listed: Mutex<Vec<String>>,
        removed: Mutex<Vec<String>>,
    }

    impl HostingApi for FakeApi {
        async fn channel_files(&self, user: &str, channel: &str) -> Result<Vec<String>> {
            self.listed.lock().unwrap().push(format!("{}/{}", user, channel));
            Ok(self.files.clone())
        }

        async fn remove_file(&self, record: &ArtifactRecord) -> Result<()> {
            self.removed.lock().unwrap().push(record.to_string());
            Ok(())
        }
    }

    fn travis(branch: &str) -> CiContext {
        CiContext::detect(&EnvConfig::from_pairs([
            ("TRAVIS", "true"),
            ("TRAVIS_PULL_REQUEST", "false"),
            ("TRAVIS_BRANCH", branch),
            ("TRAVIS_TAG", ""),
        ]))
    }

    #[test]
    fn test_resolve_channel() {
        let ci = travis("feature");
        assert_eq!(
            resolve_channel(Some("custom"), &Version::new("1.0"), &ci).unwrap(),
            Channel::new("custom")
        );
        assert_eq!(
            resolve_channel(None, &Version::new("1.0"), &ci).unwrap(),
            Channel::Main
        );
        assert_eq!(
            resolve_channel(None, &Version::new("1.0+2.abc"), &ci).unwrap(),
            Channel::new("feature")
        );
    }

    #[test]
    fn test_resolve_channel_needs_ci_for_dev_builds() {
        let ci = CiContext::detect(&EnvConfig::default());
        assert!(resolve_channel(None, &Version::new("1.0"), &ci).is_ok());
        assert!(matches!(
            resolve_channel(None, &Version::new("1.0rc1"), &ci),
            Err(CondaciError::Ci(_))
        ));
    }

    #[tokio::test]
    async fn test_purge_removes_superseded_builds() {
        let api = FakeApi {
            files: vec![
                "acme/widget/1.3.0+1.ccc/linux-64/widget-1.3.0+1.ccc-py27.tar.bz2".to_string(),
                "acme/widget/1.3.0/linux-64/widget-1.3.0-py27.tar.bz2".to_string(),
                "garbage".to_string(),
            ],
            ..Default::default()
        };
        let output = OutputManager::new(false, true);
        let removed = purge_old_files(
            &api,
            "acme",
            &Channel::new("master"),
            Path::new("/bld/linux-64/widget-1.3.0+2.def-py27.tar.bz2"),
            &output,
        )
        .await
        .unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(
            *api.removed.lock().unwrap(),
            vec!["acme/widget/1.3.0+1.ccc/linux-64/widget-1.3.0+1.ccc-py27.tar.bz2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_pull_request_build_is_not_uploaded() {
        let ci = CiContext::detect(&EnvConfig::from_pairs([
            ("TRAVIS", "true"),
            ("TRAVIS_PULL_REQUEST", "17"),
            ("TRAVIS_BRANCH", "feature"),
            ("TRAVIS_TAG", ""),
        ]));
        let api = FakeApi {
            files: vec!["acme/widget/1.3.0+1.ccc/linux-64/widget-1.3.0+1.ccc-py27.tar.bz2".to_string()],
            ..Default::default()
        };
        let tmp = tempfile::tempdir().unwrap();
        let resolver = VersionResolver::for_checkout(tmp.path());
        let mc = Miniconda::new("/nonexistent", crate::platform::HostPlatform::Linux);
        let output = OutputManager::new(false, true);

        let outcome = Uploader::new(&mc, &api, &ci, &resolver, &output)
            .upload_if_appropriate("acme", "s3cr3t", None, Path::new("conda"))
            .await
            .unwrap();

        assert!(matches!(outcome, UploadOutcome::Skipped { .. }));
        assert!(api.listed.lock().unwrap().is_empty());
        assert!(api.removed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purge_skips_main_channel() {
        let api = FakeApi {
            files: vec!["acme/widget/1.3.0+1.ccc/linux-64/widget-1.3.0+1.ccc-py27.tar.bz2".to_string()],
            ..Default::default()
        };
        let output = OutputManager::new(false, true);
        let removed = purge_old_files(
            &api,
            "acme",
            &Channel::Main,
            Path::new("/bld/linux-64/widget-1.3.0+2.def-py27.tar.bz2"),
            &output,
        )
        .await
        .unwrap();
        assert!(removed.is_empty());
        assert!(api.removed.lock().unwrap().is_empty());
    }
}
