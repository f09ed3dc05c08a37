//! Shell command execution for command handlers.

use std::path::Path;

use tracing::debug;

use crate::error::EnvError;

/// Captured output of a finished shell command.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `cmd` through `sh -c` in `cwd` and capture its output.
///
/// A nonzero exit status is an error carrying the command's stderr.
pub async fn execute_shell(cmd: &str, cwd: &Path) -> Result<CommandOutput, EnvError> {
    debug!(cmd, cwd = ?cwd, "executing shell command");
    let output = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .current_dir(cwd)
        .output()
        .await?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(EnvError::Shell {
            status: output.status.code().unwrap_or(-1),
            stderr,
        });
    }
    Ok(CommandOutput { stdout, stderr })
}
