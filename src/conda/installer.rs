//! Miniconda download and installation.

use super::Miniconda;
use crate::cli::OutputManager;
use crate::error::{PlatformError, Result};
use crate::platform::{Arch, Host, HostPlatform};
use crate::process::{ToolCommand, execute, execute_sequence};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const MINICONDA_BASE_URL: &str = "http://repo.continuum.io/miniconda/Miniconda";

/// Python flavours with a published miniconda installer
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PythonVersion {
    /// Python 2.7 (Miniconda)
    #[value(name = "2.7")]
    Py27,
    /// Python 3.4 (Miniconda3)
    #[value(name = "3.4")]
    Py34,
}

impl PythonVersion {
    fn installer_suffix(self) -> &'static str {
        match self {
            PythonVersion::Py27 => "",
            PythonVersion::Py34 => "3",
        }
    }
}

impl FromStr for PythonVersion {
    type Err = crate::error::CondaciError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "2.7" => Ok(PythonVersion::Py27),
            "3.4" => Ok(PythonVersion::Py34),
            other => Err(PlatformError::UnsupportedPython {
                version: other.to_string(),
            }
            .into()),
        }
    }
}

/// Download URL of the latest installer for a host
pub fn installer_url(platform: HostPlatform, python: PythonVersion, arch: Arch) -> String {
    let (os, ext) = match platform {
        HostPlatform::Linux => ("Linux", ".sh"),
        HostPlatform::MacOs => ("MacOSX", ".sh"),
        HostPlatform::Windows => ("Windows", ".exe"),
    };
    let arch = match arch {
        Arch::X86_64 => "x86_64",
        Arch::X86 => "x86",
    };
    format!(
        "{}{}-latest-{}-{}{}",
        MINICONDA_BASE_URL,
        python.installer_suffix(),
        os,
        arch,
        ext
    )
}

/// Scratch location for the downloaded installer
fn temp_installer_path(platform: HostPlatform) -> Result<PathBuf> {
    let id = uuid::Uuid::new_v4();
    if platform.is_windows() {
        return Ok(PathBuf::from(format!(r"C:\{}.exe", id)));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not determine the home directory"))?;
    Ok(home.join(format!("{}.sh", id)))
}

/// Download `url` to `dest`
pub async fn download_file(url: &str, dest: &Path) -> Result<()> {
    log::info!("Downloading {} to {}", url, dest.display());

    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;
    tokio::fs::write(dest, &bytes).await?;
    Ok(())
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o755);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

async fn install(installer: &Path, mc: &Miniconda, output: &OutputManager) -> Result<()> {
    let _ = output.println(&format!("Installing miniconda to {}", mc.root().display()));
    let cmd = if mc.platform().is_windows() {
        ToolCommand::new(installer)
            .arg("/S")
            .arg(format!("/D={}", mc.root().display()))
    } else {
        make_executable(installer).await?;
        ToolCommand::new(installer).arg("-b").arg("-p").arg(mc.root())
    };
    execute(&cmd, output).await
}

/// Provision miniconda with conda-build and binstar
///
/// Optionally registers `channel` as an extra dependency source.
pub async fn setup_miniconda(
    python: PythonVersion,
    mc: &Miniconda,
    host: Host,
    channel: Option<&str>,
    output: &OutputManager,
) -> Result<()> {
    let url = installer_url(host.platform, python, host.arch);
    let _ = output.println(&format!("Setting up miniconda from URL {}", url));
    let _ = output.println(&format!("(Installing to '{}')", mc.root().display()));

    let installer = temp_installer_path(host.platform)?;
    download_file(&url, &installer).await?;
    let installed = install(&installer, mc, output).await;
    if let Err(e) = tokio::fs::remove_file(&installer).await {
        log::warn!("could not remove installer {}: {}", installer.display(), e);
    }
    installed?;

    let conda = mc.conda();
    let mut cmds = vec![
        ToolCommand::new(&conda).args(["update", "-q", "--yes", "conda"]),
        ToolCommand::new(&conda).args([
            "install",
            "-q",
            "--yes",
            "conda-build",
            "jinja2",
            "binstar",
        ]),
    ];
    match channel {
        Some(channel) => {
            let _ = output.println(&format!("(adding channel '{}' for dependencies)", channel));
            cmds.push(ToolCommand::new(&conda).args(["config", "--add", "channels", channel]));
        }
        None => {
            let _ = output.println(
                "No channels have been configured (all dependencies have to be sourced from anaconda)",
            );
        }
    }
    execute_sequence(&cmds, output).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installer_urls() {
        assert_eq!(
            installer_url(HostPlatform::Linux, PythonVersion::Py27, Arch::X86_64),
            "http://repo.continuum.io/miniconda/Miniconda-latest-Linux-x86_64.sh"
        );
        assert_eq!(
            installer_url(HostPlatform::Windows, PythonVersion::Py34, Arch::X86),
            "http://repo.continuum.io/miniconda/Miniconda3-latest-Windows-x86.exe"
        );
        assert_eq!(
            installer_url(HostPlatform::MacOs, PythonVersion::Py34, Arch::X86_64),
            "http://repo.continuum.io/miniconda/Miniconda3-latest-MacOSX-x86_64.sh"
        );
    }

    #[test]
    fn test_python_version_from_str() {
        assert_eq!("2.7".parse::<PythonVersion>().unwrap(), PythonVersion::Py27);
        assert!("3.5".parse::<PythonVersion>().is_err());
    }

    #[test]
    fn test_temp_installer_extension() {
        let path = temp_installer_path(HostPlatform::Windows).unwrap();
        assert!(path.to_string_lossy().ends_with(".exe"));
    }
}
