// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::process::{Command, Stdio};

use anyhow::{bail, Result};
use tracing::debug;

#[derive(Debug)]
pub struct CmdOutput {
    pub command: String,
    pub output: std::process::Output,
}

impl CmdOutput {
    pub fn new(cmd: &mut Command) -> Result<Self> {
        let output = cmd.output()?;
        let cmd_output = CmdOutput {
            command: format!("{cmd:?}"),
            output,
        };
        debug!("{}", cmd_output);
        Ok(cmd_output)
    }

    /// Keep the command and exit code in the error, callers report them as-is
    pub fn check(self) -> Result<Self> {
        if !self.output.status.success() {
            bail!(
                "Command {} returned non-zero exit status {}",
                self.command,
                exit_code(&self.output.status)
            );
        }
        Ok(self)
    }

    pub fn get_stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn get_stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }
}

impl std::fmt::Display for CmdOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Execute command:\n{}\nstatus:\n{}\nstdout:\n{}\nstderr:\n{}",
            self.command,
            self.output.status,
            self.get_stdout(),
            self.get_stderr()
        )
    }
}

/// Run a command connected to our own terminal.
///
/// For children that prompt the user (key passphrase, become password),
/// their output is not captured.
pub fn run_inherited(cmd: &mut Command) -> Result<()> {
    let command = format!("{cmd:?}");
    debug!("Execute interactive command: {command}");
    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    if !status.success() {
        bail!(
            "Command {} returned non-zero exit status {}",
            command,
            exit_code(&status)
        );
    }
    Ok(())
}

fn exit_code(status: &std::process::ExitStatus) -> String {
    match status.code() {
        Some(c) => c.to_string(),
        // Killed by a signal
        None => "unknown".to_string(),
    }
}
