//! Process-spawning tool runner.

use super::{ToolInvocation, ToolOutput, ToolRunner};
use crate::error::{Error, Result};
use std::io;
use std::process::Command;

/// Runs tools as child processes and waits for them to exit.
///
/// There is no timeout: a hung tool hangs the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        log::debug!("Running {}", invocation);

        let output = Command::new(invocation.program())
            .args(invocation.args())
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    Error::ToolUnavailable {
                        program: invocation.program().display().to_string(),
                        source: e,
                    }
                } else {
                    Error::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::ExternalProcess {
                command: invocation.to_string(),
                status: output.status.code(),
                stdout,
                stderr,
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }
}
