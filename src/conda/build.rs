//! `conda build` invocation.

use super::Miniconda;
use crate::cli::OutputManager;
use crate::error::Result;
use crate::platform::Arch;
use crate::process::{ToolCommand, capture, execute};
use crate::version::{ReleaseKind, Version};
use std::path::{Path, PathBuf};

/// Helper script that configures the Windows SDK for 64-bit extension builds
pub const WINDOWS_ENV_SCRIPT_URL: &str = "https://raw.githubusercontent.com/jabooth/python-appveyor-conda-example/master/continuous-integration/appveyor/run_with_env.cmd";

/// Where the Windows SDK helper script is stored
pub const WINDOWS_ENV_SCRIPT_PATH: &str = r"C:\run_with_env.cmd";

/// Variable through which recipes can read the resolved version
pub const VERSION_VARIABLE: &str = "CONDACI_VERSION";

/// Hosting credential that must not leak into Windows build logs
const HOSTING_KEY_VARIABLE: &str = "BINSTAR_KEY";

/// One package build
#[derive(Debug, Clone)]
pub struct BuildRequest<'a> {
    /// Recipe directory
    pub recipe: &'a Path,
    /// Resolved version, when one could be determined
    pub version: Option<&'a Version>,
    /// Owner whose `channel/master` supplies dev dependencies
    pub channel_owner: Option<&'a str>,
    /// Host architecture, used on Windows
    pub arch: Arch,
}

/// `major.minor` of the provisioned python
pub async fn python_version(mc: &Miniconda) -> Result<String> {
    let cmd = ToolCommand::new(mc.python()).args([
        "-c",
        "import sys; print('{}.{}'.format(*sys.version_info[:2]))",
    ]);
    capture(&cmd).await
}

/// Path of the package a recipe builds to
pub async fn build_output_path(mc: &Miniconda, recipe: &Path) -> Result<PathBuf> {
    let cmd = ToolCommand::new(mc.conda())
        .args(["build", "--output"])
        .arg(recipe);
    let out = capture(&cmd).await?;
    // conda-build may print notices before the path
    let path = out.lines().last().unwrap_or_default().trim();
    Ok(PathBuf::from(path))
}

/// Build the recipe with conda-build
pub async fn build_package(
    mc: &Miniconda,
    request: &BuildRequest<'_>,
    output: &OutputManager,
) -> Result<()> {
    let _ = output.println(&format!(
        "Building package at path {}",
        request.recipe.display()
    ));

    // Dev builds pull other dev dependencies from the owner's master channel.
    let kind = request.version.map_or(ReleaseKind::Development, Version::kind);
    if kind != ReleaseKind::Development {
        let _ = output.println(&format!("building a {} - no master channel added.", kind));
    } else {
        let _ = output.println("building a non-release non-RC build - adding master channel.");
        match request.channel_owner {
            Some(owner) => {
                let cmd = ToolCommand::new(mc.conda()).args([
                    "config".to_string(),
                    "--add".to_string(),
                    "channels".to_string(),
                    format!("{}/channel/master", owner),
                ]);
                execute(&cmd, output).await?;
            }
            None => {
                let _ = output.warn("no channel provided - cannot add master channel");
            }
        }
    }

    let cmd = if mc.platform().is_windows() {
        windows_build_command(mc, request).await?
    } else {
        ToolCommand::new(mc.conda())
            .args(["build", "-q"])
            .arg(request.recipe)
    };
    let cmd = match request.version {
        Some(version) => cmd.env(VERSION_VARIABLE, version.as_str()),
        None => cmd,
    };
    execute(&cmd, output).await
}

async fn windows_build_command(mc: &Miniconda, request: &BuildRequest<'_>) -> Result<ToolCommand> {
    let python_version = python_version(mc).await?;
    Ok(ToolCommand::new("cmd")
        .args(["/E:ON", "/V:ON", "/C", WINDOWS_ENV_SCRIPT_PATH])
        .arg(mc.conda())
        .args(["build", "-q"])
        .arg(request.recipe)
        .env_remove(HOSTING_KEY_VARIABLE)
        .env("PYTHON_ARCH", request.arch.bits())
        .env("PYTHON_VERSION", python_version))
}
