//! Host operating system and architecture detection.

use crate::EnvConfig;
use crate::error::{PlatformError, Result};
use std::fmt;

/// Host operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    /// Linux
    Linux,
    /// macOS
    MacOs,
    /// Windows
    Windows,
}

impl HostPlatform {
    /// Platform of the running process
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Platform for a `std::env::consts::OS` value
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" => Ok(HostPlatform::Linux),
            "macos" => Ok(HostPlatform::MacOs),
            "windows" => Ok(HostPlatform::Windows),
            other => Err(PlatformError::UnsupportedHost {
                os: other.to_string(),
            }
            .into()),
        }
    }

    /// Whether this is Windows
    pub fn is_windows(self) -> bool {
        self == HostPlatform::Windows
    }
}

/// Host pointer width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// 32 bit
    X86,
    /// 64 bit
    X86_64,
}

impl Arch {
    /// Architecture of the running host
    ///
    /// On AppVeyor Windows builds the `PLATFORM` variable decides, since the
    /// build matrix may target a different width than the agent.
    pub fn detect(platform: HostPlatform, env: &EnvConfig) -> Result<Self> {
        if platform.is_windows() && env.contains("APPVEYOR") {
            let value = env.get("PLATFORM").unwrap_or_default();
            return match value.as_str() {
                "x86" => Ok(Arch::X86),
                "x64" => Ok(Arch::X86_64),
                _ => Err(PlatformError::UnrecognizedPlatform { value }.into()),
            };
        }

        if cfg!(target_pointer_width = "64") {
            Ok(Arch::X86_64)
        } else {
            Ok(Arch::X86)
        }
    }

    /// Width in bits as a string, as expected by `PYTHON_ARCH`
    pub fn bits(self) -> &'static str {
        match self {
            Arch::X86 => "32",
            Arch::X86_64 => "64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bit", self.bits())
    }
}

/// Detected host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Host {
    /// Operating system
    pub platform: HostPlatform,
    /// Architecture
    pub arch: Arch,
}

impl Host {
    /// Detect the running host
    pub fn detect(env: &EnvConfig) -> Result<Self> {
        let platform = HostPlatform::current()?;
        let arch = Arch::detect(platform, env)?;
        Ok(Self { platform, arch })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CondaciError;

    #[test]
    fn test_from_os() {
        assert_eq!(HostPlatform::from_os("linux").unwrap(), HostPlatform::Linux);
        assert_eq!(HostPlatform::from_os("macos").unwrap(), HostPlatform::MacOs);
        assert!(HostPlatform::from_os("freebsd").is_err());
    }

    #[test]
    fn test_appveyor_platform_override() {
        let env = EnvConfig::from_pairs([("APPVEYOR", "True"), ("PLATFORM", "x86")]);
        assert_eq!(Arch::detect(HostPlatform::Windows, &env).unwrap(), Arch::X86);

        let env = EnvConfig::from_pairs([("APPVEYOR", "True"), ("PLATFORM", "x64")]);
        assert_eq!(Arch::detect(HostPlatform::Windows, &env).unwrap(), Arch::X86_64);
    }

    #[test]
    fn test_appveyor_unrecognized_platform_fails() {
        let env = EnvConfig::from_pairs([("APPVEYOR", "True"), ("PLATFORM", "ARM")]);
        assert!(matches!(
            Arch::detect(HostPlatform::Windows, &env),
            Err(CondaciError::Platform(PlatformError::UnrecognizedPlatform { .. }))
        ));
    }

    #[test]
    fn test_platform_variable_ignored_off_windows() {
        let env = EnvConfig::from_pairs([("APPVEYOR", "True"), ("PLATFORM", "ARM")]);
        assert!(Arch::detect(HostPlatform::Linux, &env).is_ok());
        assert_eq!(Arch::X86_64.to_string(), "64bit");
    }
}
