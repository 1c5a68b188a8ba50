//! Artifact metadata parsed from hosted identifiers and local build paths.
//!
//! Hosted identifiers look like `user/name/version/platform/filename`, where
//! the filename itself encodes `name-version-configuration.ext`.

use crate::error::{ArtifactError, Result};
use crate::version::Version;
use std::fmt;
use std::path::Path;

/// One artifact hosted on a channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRecord {
    full_name: String,
    /// Owning user or organisation
    pub user: String,
    /// Project name
    pub name: String,
    /// Full version string
    pub version: Version,
    /// Target platform, e.g. `linux-64`
    pub platform: String,
    /// Build configuration, e.g. `py27`
    pub configuration: String,
    /// Path below the version segment, e.g. `linux-64/widget-1.0-py27.tar.bz2`
    pub basename: String,
}

impl ArtifactRecord {
    /// Parse a hosted identifier
    pub fn parse(full_name: &str) -> Result<Self> {
        let normalized = full_name.replace('\\', "/");
        let segments: Vec<&str> = normalized.split('/').collect();

        let malformed = |reason: &str| ArtifactError::MalformedIdentifier {
            identifier: full_name.to_string(),
            reason: reason.to_string(),
        };

        if segments.len() < 5 {
            return Err(malformed("expected user/name/version/platform/filename").into());
        }
        if segments[..5].iter().any(|s| s.is_empty()) {
            return Err(malformed("empty path segment").into());
        }

        let configuration = segments[4]
            .split('-')
            .nth(2)
            .and_then(|token| token.split('.').next())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| malformed("filename has no configuration token"))?;

        Ok(Self {
            full_name: full_name.to_string(),
            user: segments[0].to_string(),
            name: segments[1].to_string(),
            version: Version::new(segments[2]),
            platform: segments[3].to_string(),
            configuration: configuration.to_string(),
            basename: segments[3..].join("/"),
        })
    }

    /// The identifier this record was parsed from
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Multi-line dump of every field, for candidate listings
    pub fn all_info(&self) -> String {
        [
            format!("         user: {}", self.user),
            format!("         name: {}", self.name),
            format!("     basename: {}", self.basename),
            format!("      version: {}", self.version),
            format!("     platform: {}", self.platform),
            format!("configuration: {}", self.configuration),
        ]
        .join("\n")
    }
}

impl fmt::Display for ArtifactRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// A freshly built package in the local build output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    /// Project name
    pub name: String,
    /// Version string
    pub version: Version,
    /// Platform taken from the parent directory, e.g. `linux-64`
    pub platform: String,
    /// Build configuration
    pub configuration: String,
}

impl LocalArtifact {
    /// Parse a built package path such as `.../conda-bld/linux-64/widget-1.0-py27.tar.bz2`
    pub fn from_path(path: &Path) -> Result<Self> {
        let malformed = |reason: &str| ArtifactError::MalformedIdentifier {
            identifier: path.display().to_string(),
            reason: reason.to_string(),
        };

        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| malformed("path has no file name"))?;
        let platform = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|p| p.to_str())
            .ok_or_else(|| malformed("path has no platform directory"))?;

        let (name, version, configuration) =
            parse_filename(filename).ok_or_else(|| malformed("expected name-version-configuration.ext"))?;

        Ok(Self {
            name: name.to_string(),
            version: Version::new(version),
            platform: platform.to_string(),
            configuration: configuration.to_string(),
        })
    }
}

/// Split `name-version-configuration.ext` into its three parts
///
/// Name is before the first `-`, version after it, configuration is the last
/// `-` segment with the extension removed.
pub fn parse_filename(filename: &str) -> Option<(&str, &str, &str)> {
    if filename.matches('-').count() < 2 {
        return None;
    }
    let mut tokens = filename.split('-');
    let name = tokens.next().filter(|s| !s.is_empty())?;
    let version = tokens.next().filter(|s| !s.is_empty())?;
    let last = filename.rsplit('-').next()?;
    let configuration = last.split('.').next().filter(|s| !s.is_empty())?;
    Some((name, version, configuration))
}
