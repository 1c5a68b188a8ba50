//! Artifact retention on hosting channels.
//!
//! After a new build lands on a channel, earlier development builds of the
//! same package, platform, configuration and release line are superseded.
//! Release-tagged artifacts are never removed, and the `main` channel is
//! never purged at all.

use crate::artifact::{ArtifactRecord, LocalArtifact};
use crate::error::Result;
use std::fmt;
use std::path::Path;

/// Name of the stable channel
pub const MAIN_CHANNEL: &str = "main";

/// Upload destination on the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Stable releases, never purged
    Main,
    /// Any other channel, subject to retention
    Named(String),
}

impl Channel {
    /// Channel for a given name
    pub fn new(name: &str) -> Self {
        if name == MAIN_CHANNEL {
            Channel::Main
        } else {
            Channel::Named(name.to_string())
        }
    }

    /// Channel name as used by the hosting service
    pub fn as_str(&self) -> &str {
        match self {
            Channel::Main => MAIN_CHANNEL,
            Channel::Named(name) => name,
        }
    }

    /// Whether retention may delete from this channel
    pub fn is_purgeable(&self) -> bool {
        !matches!(self, Channel::Main)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Parse hosted identifiers, skipping any that are malformed
///
/// A malformed record is logged and left out; it can never match a freshly
/// built artifact, so the rest of the pass is still sound.
pub fn parse_hosted<S: AsRef<str>>(identifiers: &[S]) -> Vec<ArtifactRecord> {
    identifiers
        .iter()
        .filter_map(|id| match ArtifactRecord::parse(id.as_ref()) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("skipping hosted file during retention: {}", e);
                None
            }
        })
        .collect()
}

/// Whether `hosted` is superseded by `new`
pub fn is_superseded(new: &LocalArtifact, hosted: &ArtifactRecord) -> bool {
    hosted.name == new.name
        && hosted.configuration == new.configuration
        && hosted.platform == new.platform
        && hosted.version != new.version
        && !hosted.version.is_release_tag()
        && new.version.same_release_line(&hosted.version)
}

/// Hosted records superseded by the package at `new_artifact_path`
pub fn files_to_remove(
    new_artifact_path: &Path,
    hosted: &[ArtifactRecord],
) -> Result<Vec<ArtifactRecord>> {
    let new = LocalArtifact::from_path(new_artifact_path)?;

    log::info!(
        "looking for old releases matching name: {} configuration: {} platform: {} version: {}",
        new.name,
        new.configuration,
        new.platform,
        new.version
    );

    Ok(hosted
        .iter()
        .filter(|record| is_superseded(&new, record))
        .cloned()
        .collect())
}

/// Retention policy bound to one channel
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    channel: Channel,
}

impl RetentionPolicy {
    /// Policy for `channel`
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Channel this policy applies to
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Records to delete after uploading `new_artifact_path`
    ///
    /// Always empty on the main channel.
    pub fn removals(
        &self,
        new_artifact_path: &Path,
        hosted: &[ArtifactRecord],
    ) -> Result<Vec<ArtifactRecord>> {
        if !self.channel.is_purgeable() {
            log::info!("on main channel - no purging of releases will be done");
            return Ok(Vec::new());
        }
        files_to_remove(new_artifact_path, hosted)
    }
}
