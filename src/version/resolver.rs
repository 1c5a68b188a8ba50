//! Version resolution for a source checkout.
//!
//! Prefers a single embedded `_version.json` sidecar; falls back to
//! `git describe --tags` when there are none or several.

use super::Version;
use crate::error::{CondaciError, Result, ToolError, VersionError};
use serde::Deserialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File name of embedded version metadata
pub const METADATA_FILE_NAME: &str = "_version.json";

/// Source of the raw `git describe --tags` string
pub trait TagDescriber {
    /// Describe HEAD relative to the most recent tag
    fn describe(&self) -> impl Future<Output = Result<String>>;
}

/// Describes HEAD by running the git CLI in a checkout
#[derive(Debug, Clone)]
pub struct GitDescribe {
    repo_path: PathBuf,
}

impl GitDescribe {
    /// Describe the repository rooted at `repo_path`
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }
}

impl TagDescriber for GitDescribe {
    async fn describe(&self) -> Result<String> {
        let git = which::which("git").map_err(|_| ToolError::NotFound {
            tool: "git".to_string(),
        })?;

        let output = tokio::process::Command::new(git)
            .args(["describe", "--tags"])
            .current_dir(&self.repo_path)
            .output()
            .await
            .map_err(|e| ToolError::Spawn {
                command: "git describe --tags".to_string(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ToolError::Failed {
                command: "git describe --tags".to_string(),
                code: output.status.code(),
                output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct MetadataFile {
    version: String,
}

/// Embedded version metadata discovered beneath a checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedMetadata {
    /// Metadata file location
    pub path: PathBuf,
    /// Version it reports
    pub version: Version,
}

impl EmbeddedMetadata {
    /// Read a single metadata file
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| VersionError::MetadataUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let parsed: MetadataFile =
            serde_json::from_str(&content).map_err(|e| VersionError::MetadataUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            version: Version::new(parsed.version.trim()),
        })
    }

    /// Find and read every metadata file under `root`
    ///
    /// Unreadable files are logged and left out.
    pub fn discover(root: &Path) -> Vec<Self> {
        WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|entry| entry.ok())
            .filter(|e| e.file_type().is_file() && e.file_name() == METADATA_FILE_NAME)
            .filter_map(|e| match Self::read(e.path()) {
                Ok(meta) => Some(meta),
                Err(err) => {
                    log::warn!("{}", err);
                    None
                }
            })
            .collect()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Rewrite raw `git describe` output into a version string
///
/// `v1.2.0-5-gabcdef` becomes `1.2.0+5.gabcdef`. Output that does not split
/// into exactly three `-` parts is returned as-is (minus any leading `v`).
pub fn normalize_git_describe(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('v')
        .or_else(|| raw.strip_prefix('V'))
        .unwrap_or(raw);

    let parts: Vec<&str> = raw.split('-').collect();
    match parts.as_slice() {
        [base, n_commits, sha] => format!("{}+{}.{}", base, n_commits, sha),
        _ => {
            log::warn!(
                "could not interpret version string '{}' from git - you may have a non-PEP440 version string",
                raw
            );
            raw.to_string()
        }
    }
}

/// Resolves the version of a checkout
#[derive(Debug, Clone)]
pub struct VersionResolver<D> {
    root: PathBuf,
    describer: D,
}

impl VersionResolver<GitDescribe> {
    /// Resolver backed by the git CLI in `root`
    pub fn for_checkout(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            describer: GitDescribe::new(root.clone()),
            root,
        }
    }
}

impl<D: TagDescriber> VersionResolver<D> {
    /// Resolver with a custom tag describer
    pub fn new(root: impl Into<PathBuf>, describer: D) -> Self {
        Self {
            root: root.into(),
            describer,
        }
    }

    /// Resolve the version of the checkout
    pub async fn resolve(&self) -> Result<Version> {
        let mut found = EmbeddedMetadata::discover(&self.root);

        if found.len() == 1
            && let Some(meta) = found.pop()
        {
            log::info!(
                "found single unambiguous embedded version {} in {}",
                meta.version,
                meta.path.display()
            );
            return Ok(meta.version);
        }

        log::warn!(
            "found {} embedded version files - falling back to git tags",
            found.len()
        );
        self.version_from_git_tags().await
    }

    async fn version_from_git_tags(&self) -> Result<Version> {
        let raw = self.describer.describe().await.map_err(|e| {
            CondaciError::from(VersionError::Unavailable {
                reason: e.to_string(),
            })
        })?;

        if raw.trim().is_empty() {
            return Err(VersionError::Unavailable {
                reason: "git describe returned no output".to_string(),
            }
            .into());
        }

        Ok(Version::new(normalize_git_describe(&raw)))
    }
}
