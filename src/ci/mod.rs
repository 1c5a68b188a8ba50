//! CI provider detection.
//!
//! Each supported provider answers the same two questions: is this a pull
//! request build, and which branch is being built. Upload routing depends
//! only on [`CiProvider`].

mod appveyor;
mod travis;

pub use appveyor::AppVeyor;
pub use travis::Travis;

use crate::EnvConfig;
use crate::error::{CiError, Result};

/// Branch-and-PR view of a CI provider
pub trait CiProvider: std::fmt::Debug {
    /// Provider name for diagnostics
    fn name(&self) -> &'static str;

    /// Whether the current build is for a pull request
    fn is_pull_request(&self) -> Result<bool>;

    /// Branch being built
    fn current_branch(&self) -> Result<String>;
}

/// CI context of the running job
#[derive(Debug)]
pub struct CiContext {
    provider: Option<Box<dyn CiProvider>>,
}

impl CiContext {
    /// Detect the active provider from the environment
    ///
    /// Travis takes precedence when both markers are present.
    pub fn detect(env: &EnvConfig) -> Self {
        let provider: Option<Box<dyn CiProvider>> = if Travis::is_active(env) {
            Some(Box::new(Travis::new(env.clone())))
        } else if AppVeyor::is_active(env) {
            Some(Box::new(AppVeyor::new(env.clone())))
        } else {
            None
        };
        Self { provider }
    }

    /// Name of the detected provider, if any
    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|p| p.name())
    }

    fn provider(&self, operation: &str) -> Result<&dyn CiProvider> {
        self.provider.as_deref().ok_or_else(|| {
            CiError::UnknownProvider {
                operation: operation.to_string(),
            }
            .into()
        })
    }

    /// Whether the current build is for a pull request
    pub fn is_pull_request(&self) -> Result<bool> {
        self.provider("resolve whether we are on a PR")?
            .is_pull_request()
    }

    /// Branch being built
    pub fn current_branch(&self) -> Result<String> {
        self.provider("decide on branch")?.current_branch()
    }

    /// Uploads are allowed for anything but pull requests
    pub fn can_upload(&self) -> Result<bool> {
        let can_upload = !self.is_pull_request()?;
        log::info!("can we upload? {}", can_upload);
        Ok(can_upload)
    }
}

pub(crate) fn required(env: &EnvConfig, provider: &str, variable: &str) -> Result<String> {
    env.get(variable).ok_or_else(|| {
        CiError::MissingVariable {
            provider: provider.to_string(),
            variable: variable.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CondaciError;

    #[test]
    fn test_no_provider_is_an_error() {
        let ctx = CiContext::detect(&EnvConfig::default());
        assert_eq!(ctx.provider_name(), None);
        assert!(matches!(
            ctx.is_pull_request(),
            Err(CondaciError::Ci(CiError::UnknownProvider { .. }))
        ));
        assert!(matches!(
            ctx.current_branch(),
            Err(CondaciError::Ci(CiError::UnknownProvider { .. }))
        ));
    }

    #[test]
    fn test_travis_detected_before_appveyor() {
        let env = EnvConfig::from_pairs([
            ("TRAVIS", "true"),
            ("APPVEYOR", "True"),
            ("TRAVIS_PULL_REQUEST", "false"),
        ]);
        let ctx = CiContext::detect(&env);
        assert_eq!(ctx.provider_name(), Some("Travis"));
        assert!(ctx.can_upload().unwrap());
    }

    #[test]
    fn test_appveyor_pull_request_blocks_upload() {
        let env = EnvConfig::from_pairs([
            ("APPVEYOR", "True"),
            ("APPVEYOR_PULL_REQUEST_NUMBER", "42"),
        ]);
        let ctx = CiContext::detect(&env);
        assert_eq!(ctx.provider_name(), Some("AppVeyor"));
        assert!(!ctx.can_upload().unwrap());
    }
}
