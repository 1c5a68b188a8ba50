//! External tool execution.
//!
//! Every conda, binstar and python invocation goes through [`ToolCommand`].
//! Output is streamed line by line as it arrives and also captured, so a
//! failing command can re-surface what it printed. Secret arguments are
//! replaced by a label wherever the command line is displayed.

use crate::cli::OutputManager;
use crate::error::{Result, ToolError};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

#[derive(Debug, Clone)]
enum Arg {
    Plain(OsString),
    Secret { value: String, label: &'static str },
}

/// A command line for an external tool
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<Arg>,
    env_additions: Vec<(String, String)>,
    env_removals: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl ToolCommand {
    /// Command for `program`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env_additions: Vec::new(),
            env_removals: Vec::new(),
            current_dir: None,
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(Arg::Plain(arg.into()));
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(|a| Arg::Plain(a.into())));
        self
    }

    /// Append an argument that is shown as `label` instead of its value
    pub fn secret(mut self, value: impl Into<String>, label: &'static str) -> Self {
        self.args.push(Arg::Secret {
            value: value.into(),
            label,
        });
        self
    }

    /// Set a variable in the child environment
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_additions.push((key.into(), value.into()));
        self
    }

    /// Remove a variable from the child environment
    pub fn env_remove(mut self, key: impl Into<String>) -> Self {
        self.env_removals.push(key.into());
        self
    }

    /// Run in `dir`
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Command line with secrets redacted
    pub fn display(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().map(|arg| match arg {
                Arg::Plain(a) => a.to_string_lossy().into_owned(),
                Arg::Secret { label, .. } => (*label).to_string(),
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Replace every secret value occurring in `text` by its label
    pub fn redact(&self, text: &str) -> String {
        self.args.iter().fold(text.to_string(), |acc, arg| match arg {
            Arg::Secret { value, label } if !value.is_empty() => acc.replace(value.as_str(), label),
            _ => acc,
        })
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        for arg in &self.args {
            match arg {
                Arg::Plain(a) => cmd.arg(a),
                Arg::Secret { value, .. } => cmd.arg(value),
            };
        }
        for key in &self.env_removals {
            cmd.env_remove(key);
        }
        for (key, value) in &self.env_additions {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Run a command, streaming its output, and fail on non-zero exit
pub async fn execute(cmd: &ToolCommand, output: &OutputManager) -> Result<()> {
    let display = cmd.display();
    let _ = output.command(&display);
    if !cmd.env_additions.is_empty() {
        let extra = cmd
            .env_additions
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = output.indent(&format!("Additional environment variables: {}", extra));
    }

    let mut child = cmd
        .to_command()
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ToolError::Spawn {
            command: display.clone(),
            source: e,
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (out, err) = tokio::join!(
        stream_lines(stdout, cmd, output),
        stream_lines(stderr, cmd, output)
    );

    let status = child.wait().await.map_err(|e| ToolError::Spawn {
        command: display.clone(),
        source: e,
    })?;

    if status.success() {
        return Ok(());
    }

    let captured = format!("{}{}", out, err);
    log::debug!("'{}' exited with {:?}", display, status.code());
    let _ = output.indent(&format!("-> {}", captured.trim_end()));
    Err(ToolError::Failed {
        command: display,
        code: status.code(),
        output: captured,
    }
    .into())
}

/// Run commands in order, stopping at the first failure
pub async fn execute_sequence(cmds: &[ToolCommand], output: &OutputManager) -> Result<()> {
    for cmd in cmds {
        execute(cmd, output).await?;
    }
    Ok(())
}

/// Run a command quietly and return its trimmed stdout
pub async fn capture(cmd: &ToolCommand) -> Result<String> {
    let display = cmd.display();
    let result = cmd
        .to_command()
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ToolError::Spawn {
            command: display.clone(),
            source: e,
        })?;

    if !result.status.success() {
        return Err(ToolError::Failed {
            command: display,
            code: result.status.code(),
            output: cmd.redact(&String::from_utf8_lossy(&result.stderr)),
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&result.stdout).trim().to_string())
}

/// Echo and capture every line until EOF
///
/// Lines are decoded lossily so non-UTF-8 tool output never stops the drain;
/// an abandoned pipe would kill the child with SIGPIPE.
async fn stream_lines<R>(reader: Option<R>, cmd: &ToolCommand, output: &OutputManager) -> String
where
    R: AsyncRead + Unpin,
{
    let mut captured = String::new();
    let Some(reader) = reader else {
        return captured;
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let raw = String::from_utf8_lossy(&buf);
                let line = cmd.redact(raw.trim_end_matches(['\r', '\n']));
                let _ = output.println(&line);
                captured.push_str(&line);
                captured.push('\n');
            }
            Err(e) => {
                log::warn!("stopped reading output of '{}': {}", cmd.display(), e);
                break;
            }
        }
    }
    captured
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_redacts_secrets() {
        let cmd = ToolCommand::new("binstar")
            .secret("s3cr3t", "BINSTAR_KEY")
            .args(["upload", "--force"]);
        assert_eq!(cmd.display(), "binstar BINSTAR_KEY upload --force");
        assert!(!cmd.display().contains("s3cr3t"));
        assert_eq!(cmd.redact("bad token s3cr3t"), "bad token BINSTAR_KEY");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_output_is_redacted() {
        let output = OutputManager::new(false, true);
        let cmd = ToolCommand::new("sh")
            .arg("-c")
            .arg("echo \"rejected $0\"; exit 1")
            .secret("s3cr3t", "BINSTAR_KEY");
        match execute(&cmd, &output).await.unwrap_err() {
            crate::error::CondaciError::Tool(ToolError::Failed { output, .. }) => {
                assert_eq!(output.trim(), "rejected BINSTAR_KEY");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_reports_failure_with_output() {
        let output = OutputManager::new(false, true);
        let cmd = ToolCommand::new("sh").args(["-c", "echo boom; exit 3"]);
        let err = execute(&cmd, &output).await.unwrap_err();
        match err {
            crate::error::CondaciError::Tool(ToolError::Failed { code, output, .. }) => {
                assert_eq!(code, Some(3));
                assert!(output.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_output_is_drained_to_the_end() {
        let output = OutputManager::new(false, true);
        let cmd = ToolCommand::new("sh").args([
            "-c",
            "printf 'caf\\351\\n'; sleep 0.2; i=0; while [ $i -lt 2000 ]; do echo line $i; i=$((i+1)); done; exit 0",
        ]);
        execute(&cmd, &output).await.unwrap();

        let cmd = ToolCommand::new("sh").args(["-c", "printf 'caf\\351\\n'; echo done; exit 2"]);
        match execute(&cmd, &output).await.unwrap_err() {
            crate::error::CondaciError::Tool(ToolError::Failed { code, output, .. }) => {
                assert_eq!(code, Some(2));
                assert!(output.starts_with("caf\u{FFFD}\n"));
                assert!(output.contains("done"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_passes_environment() {
        let cmd = ToolCommand::new("sh")
            .args(["-c", "echo $CONDACI_VERSION"])
            .env("CONDACI_VERSION", "1.2.0");
        assert_eq!(capture(&cmd).await.unwrap(), "1.2.0");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let output = OutputManager::new(false, true);
        let cmd = ToolCommand::new("/nonexistent/condaci-test-tool");
        assert!(matches!(
            execute(&cmd, &output).await,
            Err(crate::error::CondaciError::Tool(ToolError::Spawn { .. }))
        ));
    }
}
