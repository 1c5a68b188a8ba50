use crate::cli::OutputManager;
use crate::conda::{Miniconda, python_version};
use crate::error::Result;
use crate::platform::{Arch, Host, HostPlatform};
use crate::process::{ToolCommand, execute};
use crate::version::{TagDescriber, VersionResolver};
use std::path::{Path, PathBuf};

/// `~/.pypirc`
pub fn pypirc_path() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("could not determine the home directory"))?;
    Ok(home.join(".pypirc"))
}

/// Contents of a `.pypirc` with a single `pypi` index
pub fn pypirc_contents(username: &str, password: &str) -> String {
    format!(
        "[distutils]\nindex-servers = pypi\n\n[pypi]\nusername:{}\npassword:{}",
        username, password
    )
}

/// Write the credentials file
pub async fn write_pypirc(path: &Path, username: &str, password: &str) -> Result<()> {
    tokio::fs::write(path, pypirc_contents(username, password)).await?;
    Ok(())
}

/// Whether this host is the key node allowed to publish
pub fn upload_allowed(host: Host, python_version: &str) -> bool {
    host.platform == HostPlatform::Linux
        && host.arch == Arch::X86_64
        && python_version.split('.').next() == Some("2")
}

/// Publishes an sdist built with the provisioned python
pub struct PypiPublisher<'a, D> {
    mc: &'a Miniconda,
    host: Host,
    resolver: &'a VersionResolver<D>,
    output: &'a OutputManager,
}

impl<'a, D: TagDescriber> PypiPublisher<'a, D> {
    /// Publisher for `host` using the python in `mc`
    pub fn new(
        mc: &'a Miniconda,
        host: Host,
        resolver: &'a VersionResolver<D>,
        output: &'a OutputManager,
    ) -> Self {
        Self {
            mc,
            host,
            resolver,
            output,
        }
    }

    /// Upload unless credentials are missing, this is not a release, or this
    /// is not the key node. Returns whether an upload happened.
    pub async fn upload_if_appropriate(
        &self,
        username: Option<&str>,
        password: Option<&str>,
        checkout: &Path,
    ) -> Result<bool> {
        let (Some(username), Some(password)) = (username, password) else {
            let _ = self
                .output
                .println("Missing PyPI username or password, skipping upload");
            return Ok(false);
        };

        let version = self.resolver.resolve().await?;
        if !version.is_release_tag() {
            let _ = self
                .output
                .println("Not on a tagged release - not uploading to PyPI");
            return Ok(false);
        }

        let python = python_version(self.mc).await?;
        if !upload_allowed(self.host, &python) {
            let _ = self
                .output
                .println("Not on key node (Linux 64 Py2) - no PyPI upload");
            return Ok(false);
        }

        let _ = self.output.println("Setting up .pypirc file..");
        write_pypirc(&pypirc_path()?, username, password).await?;

        let _ = self
            .output
            .println(&format!("Uploading to PyPI user '{}'", username));
        let cmd = ToolCommand::new(self.mc.python())
            .args(["setup.py", "sdist", "upload"])
            .current_dir(checkout);
        execute(&cmd, self.output).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pypirc_contents() {
        assert_eq!(
            pypirc_contents("alice", "hunter2"),
            "[distutils]\nindex-servers = pypi\n\n[pypi]\nusername:alice\npassword:hunter2"
        );
    }

    #[test]
    fn test_upload_allowed_only_on_key_node() {
        let linux64 = Host {
            platform: HostPlatform::Linux,
            arch: Arch::X86_64,
        };
        assert!(upload_allowed(linux64, "2.7"));
        assert!(!upload_allowed(linux64, "3.4"));
        assert!(!upload_allowed(
            Host {
                platform: HostPlatform::Linux,
                arch: Arch::X86,
            },
            "2.7"
        ));
        assert!(!upload_allowed(
            Host {
                platform: HostPlatform::MacOs,
                arch: Arch::X86_64,
            },
            "2.7"
        ));
    }

    #[tokio::test]
    async fn test_skips_without_credentials_or_release() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(crate::version::METADATA_FILE_NAME),
            r#"{"version": "1.0+1.abc"}"#,
        )
        .unwrap();

        let mc = Miniconda::new("/nonexistent", HostPlatform::Linux);
        let output = OutputManager::new(false, true);
        let host = Host {
            platform: HostPlatform::Linux,
            arch: Arch::X86_64,
        };
        let resolver = VersionResolver::for_checkout(tmp.path());
        let publisher = PypiPublisher::new(&mc, host, &resolver, &output);

        let uploaded = publisher
            .upload_if_appropriate(None, Some("pw"), tmp.path())
            .await
            .unwrap();
        assert!(!uploaded);

        let uploaded = publisher
            .upload_if_appropriate(Some("u"), Some("pw"), tmp.path())
            .await
            .unwrap();
        assert!(!uploaded);
    }

    #[tokio::test]
    async fn test_write_pypirc() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".pypirc");
        write_pypirc(&path, "alice", "pw").await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("username:alice"));
    }
}
