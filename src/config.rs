//! Configuration passed explicitly between the CI resolver, version resolver
//! and the upload orchestrator.

use std::collections::HashMap;
use std::path::PathBuf;

/// Snapshot of the process environment taken once at start-up
///
/// Commands read CI markers and credentials from here instead of calling
/// `std::env` directly, so tests can build arbitrary environments.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build from explicit key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of a variable
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    /// Whether a variable is set (even to an empty string)
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }
}

/// Hosting channel upload settings
#[derive(Debug, Clone, Default)]
pub struct HostingConfig {
    /// User or organisation owning the uploads
    pub user: Option<String>,
    /// API key
    pub key: Option<String>,
    /// Explicit channel, otherwise derived from version and CI branch
    pub channel: Option<String>,
    /// Hosting API base URL
    pub api_url: String,
}

/// Package index upload settings
#[derive(Debug, Clone, Default)]
pub struct PypiConfig {
    /// Index username
    pub user: Option<String>,
    /// Index password
    pub password: Option<String>,
}

/// Everything a command needs besides its positional arguments
#[derive(Debug, Clone)]
pub struct CondaciConfig {
    /// Miniconda installation directory, platform default when `None`
    pub miniconda: Option<PathBuf>,
    /// Hosting channel settings
    pub hosting: HostingConfig,
    /// Package index settings
    pub pypi: PypiConfig,
    /// Environment snapshot
    pub env: EnvConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_lookup() {
        let env = EnvConfig::from_pairs([("TRAVIS", "true"), ("TRAVIS_TAG", "")]);
        assert_eq!(env.get("TRAVIS").as_deref(), Some("true"));
        assert!(env.contains("TRAVIS_TAG"));
        assert_eq!(env.get("APPVEYOR"), None);
    }
}
