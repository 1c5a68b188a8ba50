//! Error types for condaci operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for condaci operations
pub type Result<T> = std::result::Result<T, CondaciError>;

/// Main error type for all condaci operations
#[derive(Error, Debug)]
pub enum CondaciError {
    /// Version resolution errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Hosted artifact identifier errors
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// CI provider detection errors
    #[error("CI error: {0}")]
    Ci(#[from] CiError),

    /// Host platform detection errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// External tool invocation errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Hosting API errors
    #[error("Hosting error: {0}")]
    Hosting(#[from] HostingError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Version resolution errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Neither embedded metadata nor git tag history produced a version
    #[error("No version available: {reason}")]
    Unavailable {
        /// Reason for the error
        reason: String,
    },

    /// An embedded version metadata file could not be read
    #[error("Unreadable version metadata at {path}: {reason}")]
    MetadataUnreadable {
        /// Path of the metadata file
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Hosted artifact identifier errors
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Identifier does not have the `user/name/version/platform/filename` shape
    #[error("Malformed artifact identifier '{identifier}': {reason}")]
    MalformedIdentifier {
        /// Offending identifier
        identifier: String,
        /// Reason for the error
        reason: String,
    },
}

/// CI provider detection errors
#[derive(Error, Debug)]
pub enum CiError {
    /// Neither Travis nor AppVeyor markers are present
    #[error("Not running on a recognised CI provider (Travis or AppVeyor), cannot {operation}")]
    UnknownProvider {
        /// Operation that required CI context
        operation: String,
    },

    /// Provider detected but a required variable is absent
    #[error("{provider} detected but {variable} is not set")]
    MissingVariable {
        /// Provider name
        provider: String,
        /// Variable name
        variable: String,
    },
}

/// Host platform detection errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// AppVeyor reported a platform value we cannot interpret
    #[error("Unable to interpret the platform '{value}'")]
    UnrecognizedPlatform {
        /// Reported value
        value: String,
    },

    /// Host operating system has no miniconda installer
    #[error("Unsupported host operating system '{os}'")]
    UnsupportedHost {
        /// Operating system name
        os: String,
    },

    /// Requested python version has no miniconda installer
    #[error("Python version must be '2.7' or '3.4', got '{version}'")]
    UnsupportedPython {
        /// Requested version
        version: String,
    },
}

/// External tool invocation errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// Process exited with a non-zero status
    #[error("Command '{command}' failed with exit code {code:?}")]
    Failed {
        /// Redacted command line
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured output
        output: String,
    },

    /// Process could not be started
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        /// Redacted command line
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Required executable is not on PATH
    #[error("Required tool '{tool}' not found on PATH")]
    NotFound {
        /// Tool name
        tool: String,
    },
}

/// Hosting API errors
#[derive(Error, Debug)]
pub enum HostingError {
    /// Request could not be sent
    #[error("Request to {url} failed: {reason}")]
    Request {
        /// Request URL
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// API returned a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        /// HTTP method
        method: String,
        /// Request URL
        url: String,
        /// Status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("Unexpected response from {url}: {reason}")]
    Decode {
        /// Request URL
        url: String,
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl CondaciError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            CondaciError::Version(VersionError::Unavailable { .. }) => vec![
                "Ensure the checkout has at least one tag: git describe --tags".to_string(),
                "Fetch tags on shallow CI clones: git fetch --tags --unshallow".to_string(),
                "Or ship a single _version.json with a \"version\" key".to_string(),
            ],
            CondaciError::Ci(CiError::UnknownProvider { .. }) => vec![
                "Run inside Travis CI or AppVeyor".to_string(),
                "Pass --binstarchannel explicitly to avoid branch detection".to_string(),
            ],
            CondaciError::Ci(CiError::MissingVariable { variable, .. }) => {
                vec![format!("Export {} before running condaci", variable)]
            }
            CondaciError::Platform(PlatformError::UnrecognizedPlatform { .. }) => vec![
                "Set PLATFORM to 'x86' or 'x64' in appveyor.yml".to_string(),
            ],
            CondaciError::Tool(ToolError::NotFound { tool }) => vec![
                format!("Install '{}' or add it to PATH", tool),
                "Run 'condaci setup' to provision miniconda first".to_string(),
            ],
            CondaciError::Hosting(HostingError::Status { status: 401, .. }) => vec![
                "Verify the binstar key is valid and has write scope".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable
    ///
    /// Only a missing version is tolerated, and only by callers that use it
    /// advisorily.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CondaciError::Version(VersionError::Unavailable { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_message_uses_redacted_command() {
        let err = CondaciError::from(ToolError::Failed {
            command: "binstar -t BINSTAR_KEY upload".to_string(),
            code: Some(1),
            output: String::new(),
        });
        let msg = err.to_string();
        assert!(msg.contains("BINSTAR_KEY"));
        assert!(msg.contains("Some(1)"));
    }

    #[test]
    fn test_version_unavailable_is_recoverable() {
        let err = CondaciError::from(VersionError::Unavailable {
            reason: "no tags".to_string(),
        });
        assert!(err.is_recoverable());
        assert!(!err.recovery_suggestions().is_empty());

        let err = CondaciError::from(CiError::UnknownProvider {
            operation: "decide on branch".to_string(),
        });
        assert!(!err.is_recoverable());
    }
}
