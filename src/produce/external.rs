//! Fallback strategy: run the external `relnotes` tool and capture its output.
//!
//! The tool is started through a fixed bash wrapper that has it write
//! markdown into a temporary file and prints that file. The file is owned by
//! the producer and removed once the run ends, whether the tool succeeded,
//! failed or was killed on timeout.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use crate::error::{ExternalToolError, ProduceError};
use crate::git::RevisionRange;

use super::{NotesProducer, ProduceContext};

/// Name of the tool inside the release tools directory.
pub const RELNOTES_BIN: &str = "relnotes";

/// Wrapper run with `bash -c`; `$1` is the tool, `$2`/`$3` the range and
/// `$4` the temporary markdown file.
pub const WRAPPER_SCRIPT: &str = r#"
set -euo pipefail
tmp="$4"
trap 'rm -f -- "${tmp}"' EXIT
"$1" --htmlize-md --preview --quiet --start-rev="$2" --end-sha="$3" --markdown-file="${tmp}" >&2
cat "${tmp}"
"#;

/// Default timeout for a tool run (10 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Environment variable to override the default timeout.
pub const TIMEOUT_ENV_VAR: &str = "PATCHNOTES_TOOL_TIMEOUT";

/// Timeout for tool runs, from [`TIMEOUT_ENV_VAR`] when set to a valid
/// number of seconds.
pub fn tool_timeout_from_env() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Runs `<release_tools_dir>/relnotes` for the range.
#[derive(Debug, Clone)]
pub struct ExternalToolProducer {
    pub release_tools_dir: PathBuf,
    pub timeout: Duration,
}

impl ExternalToolProducer {
    pub fn new(release_tools_dir: impl Into<PathBuf>) -> Self {
        Self {
            release_tools_dir: release_tools_dir.into(),
            timeout: tool_timeout_from_env(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute path of the tool binary.
    pub fn bin_path(&self) -> Result<PathBuf, ExternalToolError> {
        std::path::absolute(self.release_tools_dir.join(RELNOTES_BIN))
            .map_err(ExternalToolError::ToolPath)
    }

    fn command(
        &self,
        bin_path: &Path,
        markdown_file: &Path,
        range: &RevisionRange,
        ctx: &ProduceContext,
    ) -> Command {
        let mut cmd = Command::new("bash");
        cmd.arg("-c")
            .arg(WRAPPER_SCRIPT)
            .arg(RELNOTES_BIN)
            .arg(bin_path)
            .arg(&range.start)
            .arg(&range.end)
            .arg(markdown_file)
            .current_dir(&ctx.work_dir)
            .env_clear()
            .env("GITHUB_TOKEN", ctx.github_token.as_deref().unwrap_or_default())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(path) = env::var_os("PATH") {
            cmd.env("PATH", path);
        }

        // Own group, so a timeout can reach the tool and not just bash.
        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }

    async fn run(&self, range: &RevisionRange, ctx: &ProduceContext) -> Result<String, ExternalToolError> {
        let bin_path = self.bin_path()?;
        debug!(binpath = %bin_path.display(), "binpath set");

        if !bin_path.is_file() {
            return Err(ExternalToolError::NotFound(bin_path));
        }
        which::which("bash").map_err(|_| ExternalToolError::ShellNotFound)?;

        let markdown_file = tempfile::Builder::new()
            .prefix("relnotes-")
            .suffix(".md")
            .tempfile()
            .map_err(ExternalToolError::TempFile)?
            .into_temp_path();

        let mut cmd = self.command(&bin_path, &markdown_file, range, ctx);
        debug!(markdown_file = %markdown_file.display(), "command created");

        info!(
            workdir = %ctx.work_dir.display(),
            start = %range.start,
            end = %range.end,
            "starting release notes gatherer ... this may take a while ..."
        );

        let child = cmd.spawn().map_err(ExternalToolError::SpawnFailed)?;
        let pid = child.id();
        debug!(pid, "release notes tool started");

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(ExternalToolError::Wait)?,
            Err(_) => {
                // Dropping the wait future already killed bash.
                #[cfg(unix)]
                if let Some(pgid) = pid {
                    kill_process_group(pgid).await;
                }
                return Err(ExternalToolError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            return Err(ExternalToolError::NonZeroExit {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                bin_path,
                work_dir: ctx.work_dir.clone(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Sends SIGKILL to every process left in the group led by the wrapper.
#[cfg(unix)]
async fn kill_process_group(pgid: u32) {
    let result = Command::new("kill")
        .arg("-KILL")
        .arg("--")
        .arg(format!("-{pgid}"))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match result {
        Ok(status) if status.success() => debug!(pgid, "killed release notes tool group"),
        Ok(status) => debug!(pgid, %status, "release notes tool group already gone"),
        Err(e) => warn!(pgid, error = %e, "could not kill release notes tool group"),
    }
}

#[async_trait]
impl NotesProducer for ExternalToolProducer {
    async fn produce(
        &self,
        range: &RevisionRange,
        ctx: &ProduceContext,
    ) -> Result<String, ProduceError> {
        match self.run(range, ctx).await {
            Ok(markdown) => Ok(markdown),
            Err(e) => {
                debug!(error = %e.summary(), "execing & getting output failed");
                trace!(error = %e.full_error(), "full exec error");
                Err(e.into())
            }
        }
    }
}
