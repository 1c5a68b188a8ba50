//! Release version strings and their classification.
//!
//! A [`Version`] is the normalized string computed for the current checkout,
//! e.g. `1.2.0` when HEAD is exactly at a tag, or `1.2.0+5.gabcdef` when HEAD
//! is five commits past it. Classification is purely string based: these are
//! not semantic version comparisons, and malformed input never panics.

mod resolver;

pub use resolver::{
    EmbeddedMetadata, GitDescribe, TagDescriber, VersionResolver, normalize_git_describe,
    METADATA_FILE_NAME,
};

use std::fmt;

/// Separator between the release line and post-release build metadata
const BUILD_SEPARATOR: char = '+';

/// Marker for development tags (`1.2.0.dev3`)
const DEV_MARKER: &str = "dev";

/// Marker for release candidates (`1.2.0rc1`)
const RC_MARKER: &str = "rc";

/// Classification of a version for upload routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    /// A tag that is neither rc nor dev
    Release,
    /// Any build of a release line carrying the rc marker
    ReleaseCandidate,
    /// Anything else: dev tags and untagged builds off a final release line
    Development,
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReleaseKind::Release => "release",
            ReleaseKind::ReleaseCandidate => "release candidate",
            ReleaseKind::Development => "development build",
        };
        f.write_str(s)
    }
}

/// Normalized version string of a checkout or hosted artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Wrap a version string without validation
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The full version string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The release line: everything before the first `+`
    pub fn base(&self) -> &str {
        base_of(&self.0)
    }

    /// True when HEAD sits exactly on a tag
    pub fn is_tag(&self) -> bool {
        is_tag(&self.0)
    }

    /// True when the final dot component starts with `dev`
    pub fn is_dev_tag(&self) -> bool {
        is_dev_tag(&self.0)
    }

    /// True when the release line contains `rc`
    pub fn is_rc_tag(&self) -> bool {
        is_rc_tag(&self.0)
    }

    /// True for a tag that is neither rc nor dev
    pub fn is_release_tag(&self) -> bool {
        is_release_tag(&self.0)
    }

    /// True when `other` is a build of this version's release line
    pub fn same_release_line(&self, other: &Version) -> bool {
        same_release_line(&self.0, &other.0)
    }

    /// Classify for build and upload routing
    pub fn kind(&self) -> ReleaseKind {
        if self.is_release_tag() {
            ReleaseKind::Release
        } else if self.is_rc_tag() {
            ReleaseKind::ReleaseCandidate
        } else {
            ReleaseKind::Development
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Version {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn base_of(v: &str) -> &str {
    v.split(BUILD_SEPARATOR).next().unwrap_or(v)
}

/// True iff `v` contains no `+`
pub fn is_tag(v: &str) -> bool {
    !v.contains(BUILD_SEPARATOR)
}

/// True iff the last `.`-delimited component of `v` starts with `dev`
pub fn is_dev_tag(v: &str) -> bool {
    v.rsplit('.')
        .next()
        .is_some_and(|last| last.starts_with(DEV_MARKER))
}

/// True iff the pre-`+` portion of `v` contains `rc`
pub fn is_rc_tag(v: &str) -> bool {
    base_of(v).contains(RC_MARKER)
}

/// True iff `v` is a tag and neither rc nor dev
pub fn is_release_tag(v: &str) -> bool {
    is_tag(v) && !(is_rc_tag(v) || is_dev_tag(v))
}

/// True iff `v2` starts with the release line of `v1`
pub fn same_release_line(v1: &str, v2: &str) -> bool {
    v2.starts_with(base_of(v1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_tag() {
        assert!(is_tag("1.2.0"));
        assert!(is_tag("1.2.0rc1"));
        assert!(!is_tag("1.2.0+5.abcdef"));
        assert!(!is_tag("+"));
    }

    #[test]
    fn test_release_classification() {
        assert!(is_release_tag("1.2.0"));
        assert!(!is_release_tag("1.2.0rc1"));
        assert!(!is_release_tag("1.2.0.dev3"));
        assert!(!is_release_tag("1.2.0+5.abcdef"));
    }

    #[test]
    fn test_rc_marker_only_counts_before_build_metadata() {
        // sha fragment after '+' must not make this an rc
        assert!(!is_rc_tag("1.2.0+5.grc123"));
        assert!(is_rc_tag("1.2.0rc2+5.abc"));
    }

    #[test]
    fn test_dev_tag_uses_last_component() {
        assert!(is_dev_tag("0.4.0.dev1"));
        assert!(!is_dev_tag("0.4.0.dev1+2.abc"));
        assert!(!is_dev_tag("dev.4"));
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        for raw in ["", ".", "+", "++", "..", "+.", "abc"] {
            let v = Version::new(raw);
            let _ = v.kind();
            let _ = v.base();
            let _ = v.same_release_line(&Version::new("1.0"));
        }
        assert!(is_release_tag("abc"));
        assert!(!is_dev_tag(""));
    }

    #[test]
    fn test_same_release_line() {
        assert!(same_release_line("1.2.0", "1.2.0+5.abcdef"));
        assert!(same_release_line("1.2.0+1.aaa", "1.2.0+9.bbb"));
        assert!(!same_release_line("1.2.0", "1.3.0+1.abc"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Version::new("2.0.0").kind(), ReleaseKind::Release);
        assert_eq!(Version::new("2.0.0rc1").kind(), ReleaseKind::ReleaseCandidate);
        assert_eq!(Version::new("2.0.0.dev1").kind(), ReleaseKind::Development);
        assert_eq!(Version::new("2.0.0rc1+3.abc").kind(), ReleaseKind::ReleaseCandidate);
        assert_eq!(Version::new("2.0.0+3.abc").kind(), ReleaseKind::Development);
    }
}
