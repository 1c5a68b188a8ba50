use super::{CiProvider, required};
use crate::EnvConfig;
use crate::error::Result;

/// Branch assumed when Travis hides it behind a tag build
const TAG_BUILD_BRANCH: &str = "master";

/// Travis CI
#[derive(Debug, Clone)]
pub struct Travis {
    env: EnvConfig,
}

impl Travis {
    /// Travis view over an environment snapshot
    pub fn new(env: EnvConfig) -> Self {
        Self { env }
    }

    /// Whether Travis markers are present
    pub fn is_active(env: &EnvConfig) -> bool {
        env.contains("TRAVIS")
    }
}

impl CiProvider for Travis {
    fn name(&self) -> &'static str {
        "Travis"
    }

    fn is_pull_request(&self) -> Result<bool> {
        Ok(required(&self.env, self.name(), "TRAVIS_PULL_REQUEST")? != "false")
    }

    fn current_branch(&self) -> Result<String> {
        let branch = required(&self.env, self.name(), "TRAVIS_BRANCH")?;
        let tag = self.env.get("TRAVIS_TAG").unwrap_or_default();

        // On tag builds Travis reports the tag as the branch too.
        if tag == branch {
            log::warn!(
                "on travis and TRAVIS_TAG == TRAVIS_BRANCH ({}) - assuming branch '{}'",
                branch,
                TAG_BUILD_BRANCH
            );
            return Ok(TAG_BUILD_BRANCH.to_string());
        }
        Ok(branch)
    }
}
