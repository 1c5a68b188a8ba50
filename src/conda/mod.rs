//! Miniconda toolchain: provisioning and package builds.

mod build;
mod installer;

pub use build::{
    BuildRequest, VERSION_VARIABLE, WINDOWS_ENV_SCRIPT_PATH, WINDOWS_ENV_SCRIPT_URL,
    build_output_path, build_package, python_version,
};
pub use installer::{PythonVersion, download_file, installer_url, setup_miniconda};

use crate::error::Result;
use crate::platform::HostPlatform;
use std::path::{Path, PathBuf};

/// A miniconda installation on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Miniconda {
    root: PathBuf,
    platform: HostPlatform,
}

impl Miniconda {
    /// Installation rooted at `root` on `platform`
    pub fn new(root: impl Into<PathBuf>, platform: HostPlatform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    /// Installation at `root`, or the platform default when `None`
    pub fn resolve(root: Option<PathBuf>, platform: HostPlatform) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => Self::default_dir(platform)?,
        };
        Ok(Self::new(root, platform))
    }

    /// Default install location: `C:\Miniconda` on Windows, `~/miniconda` elsewhere
    pub fn default_dir(platform: HostPlatform) -> Result<PathBuf> {
        if platform.is_windows() {
            return Ok(PathBuf::from(r"C:\Miniconda"));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine the home directory"))?;
        Ok(home.join("miniconda"))
    }

    /// Installation root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host platform this installation targets
    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    /// Directory holding the installed executables
    pub fn script_dir(&self) -> PathBuf {
        let name = if self.platform.is_windows() { "Scripts" } else { "bin" };
        self.root.join(name)
    }

    /// `conda` executable
    pub fn conda(&self) -> PathBuf {
        self.script_dir().join("conda")
    }

    /// `binstar` executable
    pub fn binstar(&self) -> PathBuf {
        self.script_dir().join("binstar")
    }

    /// `python` executable
    pub fn python(&self) -> PathBuf {
        self.script_dir().join("python")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_paths() {
        let mc = Miniconda::new("/opt/mc", HostPlatform::Linux);
        assert_eq!(mc.conda(), PathBuf::from("/opt/mc/bin/conda"));
        assert_eq!(mc.binstar(), PathBuf::from("/opt/mc/bin/binstar"));
        assert_eq!(mc.python(), PathBuf::from("/opt/mc/bin/python"));

        let mc = Miniconda::new("mc", HostPlatform::Windows);
        assert_eq!(mc.script_dir(), Path::new("mc").join("Scripts"));
    }

    #[test]
    fn test_resolve_prefers_explicit_root() {
        let mc = Miniconda::resolve(Some(PathBuf::from("/tmp/mc")), HostPlatform::MacOs).unwrap();
        assert_eq!(mc.root(), Path::new("/tmp/mc"));

        let mc = Miniconda::resolve(None, HostPlatform::Windows).unwrap();
        assert_eq!(mc.root(), Path::new(r"C:\Miniconda"));
    }
}
