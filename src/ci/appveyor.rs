use super::{CiProvider, required};
use crate::EnvConfig;
use crate::error::Result;

/// AppVeyor
#[derive(Debug, Clone)]
pub struct AppVeyor {
    env: EnvConfig,
}

impl AppVeyor {
    /// AppVeyor view over an environment snapshot
    pub fn new(env: EnvConfig) -> Self {
        Self { env }
    }

    /// Whether AppVeyor markers are present
    pub fn is_active(env: &EnvConfig) -> bool {
        env.contains("APPVEYOR")
    }
}

impl CiProvider for AppVeyor {
    fn name(&self) -> &'static str {
        "AppVeyor"
    }

    fn is_pull_request(&self) -> Result<bool> {
        Ok(self.env.contains("APPVEYOR_PULL_REQUEST_NUMBER"))
    }

    fn current_branch(&self) -> Result<String> {
        required(&self.env, self.name(), "APPVEYOR_REPO_BRANCH")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch() {
        let ci = AppVeyor::new(EnvConfig::from_pairs([("APPVEYOR_REPO_BRANCH", "master")]));
        assert_eq!(ci.current_branch().unwrap(), "master");
        assert!(!ci.is_pull_request().unwrap());
        assert!(AppVeyor::new(EnvConfig::default()).current_branch().is_err());
    }
}
