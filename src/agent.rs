// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

//! SSH agent lifecycle for the duration of one playbook run.

use std::{
    path::Path,
    process::{Command, Stdio},
};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::cmd::{run_inherited, CmdOutput};

const AUTH_SOCK_VAR: &str = "SSH_AUTH_SOCK";
const AGENT_PID_VAR: &str = "SSH_AGENT_PID";

/// Environment exported by a running agent.
///
/// Kept as explicit values passed to the children that need them, our own
/// process environment is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshAgent {
    pub auth_sock: String,
    pub pid: String,
}

impl SshAgent {
    /// Start a new agent and capture its connection variables
    pub fn start() -> Result<Self> {
        let mut cmd = Command::new("ssh-agent");
        let out = CmdOutput::new(&mut cmd)
            .context("Starting the SSH agent")?
            .check()?;
        let agent = Self::from_output(&out.get_stdout())?;
        debug!("Started SSH agent with pid {}", agent.pid);
        Ok(agent)
    }

    /// Parse the Bourne-style `VAR=value; export VAR;` lines the agent prints
    fn from_output(output: &str) -> Result<Self> {
        let mut auth_sock = None;
        let mut pid = None;
        for line in output.lines() {
            if !line.starts_with(AUTH_SOCK_VAR) && !line.starts_with(AGENT_PID_VAR) {
                continue;
            }
            let assignment = match line.split_once(';') {
                Some((a, _)) => a,
                None => line,
            };
            let Some((key, value)) = assignment.split_once('=') else {
                continue;
            };
            match key {
                AUTH_SOCK_VAR => auth_sock = Some(value.to_string()),
                AGENT_PID_VAR => pid = Some(value.to_string()),
                _ => (),
            }
        }
        match (auth_sock, pid) {
            (Some(auth_sock), Some(pid)) => Ok(Self { auth_sock, pid }),
            _ => bail!("Could not read {AUTH_SOCK_VAR} and {AGENT_PID_VAR} from ssh-agent output"),
        }
    }

    /// Variables to inject into children using this agent
    pub fn vars(&self) -> [(&'static str, &str); 2] {
        [
            (AUTH_SOCK_VAR, self.auth_sock.as_str()),
            (AGENT_PID_VAR, self.pid.as_str()),
        ]
    }

    /// `ssh-add` prompts for the passphrase, let it use our terminal
    pub fn add_key(&self, key: &Path) -> Result<()> {
        let mut cmd = Command::new("ssh-add");
        cmd.arg(key).envs(self.vars());
        run_inherited(&mut cmd)
            .with_context(|| format!("Adding key '{}' to the SSH agent", key.display()))
    }

    /// Stop the agent, discarding its output
    pub fn kill(self) -> Result<()> {
        let mut cmd = Command::new("ssh-agent");
        cmd.arg("-k")
            .envs(self.vars())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let status = cmd.status().context("Stopping the SSH agent")?;
        if !status.success() {
            bail!("Could not stop the SSH agent with pid {}", self.pid);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const AGENT_OUTPUT: &str = "SSH_AUTH_SOCK=/tmp/ssh-XXXXXXdt5Gjd/agent.2202; export SSH_AUTH_SOCK;
SSH_AGENT_PID=2203; export SSH_AGENT_PID;
echo Agent pid 2203;
";

    #[test]
    fn it_parses_agent_output() {
        let agent = SshAgent::from_output(AGENT_OUTPUT).unwrap();
        assert_eq!(
            agent,
            SshAgent {
                auth_sock: "/tmp/ssh-XXXXXXdt5Gjd/agent.2202".to_string(),
                pid: "2203".to_string(),
            }
        );
    }

    #[test]
    fn it_exposes_agent_variables() {
        let agent = SshAgent {
            auth_sock: "/tmp/agent.42".to_string(),
            pid: "43".to_string(),
        };
        assert_eq!(
            agent.vars(),
            [("SSH_AUTH_SOCK", "/tmp/agent.42"), ("SSH_AGENT_PID", "43")]
        );
    }

    #[rstest]
    #[case("")]
    #[case("echo Agent pid 2203;\n")]
    #[case("SSH_AUTH_SOCK=/tmp/ssh-XXXXXXdt5Gjd/agent.2202; export SSH_AUTH_SOCK;\n")]
    #[case("SSH_AGENT_PID=2203; export SSH_AGENT_PID;\n")]
    fn it_rejects_incomplete_agent_output(#[case] output: &str) {
        assert!(SshAgent::from_output(output).is_err());
    }
}
