// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::paths::PLAYBOOK_FILE;

const DEFAULT_KEY: &str = ".ssh/id_ed25519";

/// Wrapper as the config file has sections
#[derive(Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
struct RawConfiguration {
    #[serde(default)]
    run: RunSection,
    #[serde(default)]
    ssh: SshSection,
}

// Note, "key = " lines produce Some("") when using Option
// So let's use String everywhere and clean afterwards.
#[derive(Deserialize, Debug, PartialEq, Eq, Default)]
struct RunSection {
    #[serde(default)]
    directory: String,
    #[serde(default)]
    playbook: String,
}

#[derive(Deserialize, Debug, PartialEq, Eq, Default)]
struct SshSection {
    #[serde(default)]
    key: String,
    #[serde(default)]
    agent: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Configuration {
    /// Install root override, highest priority after the CLI flag
    pub directory: Option<PathBuf>,
    /// Playbook file name inside the run directory
    pub playbook: String,
    /// Private key loaded into the agent
    pub key: PathBuf,
    /// Whether to manage an SSH agent around the run
    pub agent: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            directory: None,
            playbook: PLAYBOOK_FILE.to_string(),
            key: default_key(),
            agent: true,
        }
    }
}

fn default_key() -> PathBuf {
    let home = match env::var_os("HOME") {
        Some(h) => PathBuf::from(h),
        None => PathBuf::from("/root"),
    };
    home.join(DEFAULT_KEY)
}

impl Configuration {
    fn parse(src: &str) -> Result<Self> {
        let parsed: RawConfiguration = serde_ini::from_str(src)?;
        Configuration::try_from(parsed)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let c = read_to_string(path)?;
        Self::parse(&c)
    }
}

impl TryFrom<RawConfiguration> for Configuration {
    type Error = anyhow::Error;

    fn try_from(raw: RawConfiguration) -> Result<Self> {
        let defaults = Configuration::default();
        let directory = if raw.run.directory.is_empty() {
            None
        } else {
            Some(PathBuf::from(raw.run.directory))
        };
        let playbook = if raw.run.playbook.is_empty() {
            defaults.playbook
        } else {
            raw.run.playbook
        };
        let key = if raw.ssh.key.is_empty() {
            defaults.key
        } else {
            PathBuf::from(raw.ssh.key)
        };
        let agent = if raw.ssh.agent.is_empty() {
            defaults.agent
        } else {
            raw.ssh
                .agent
                .parse()
                .with_context(|| format!("Invalid agent setting '{}'", raw.ssh.agent))?
        };
        Ok(Self {
            directory,
            playbook,
            key,
            agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn it_parses_empty_config_file() {
        let conf = Configuration::parse("").unwrap();
        assert_eq!(conf, Configuration::default());
    }

    #[test]
    fn it_parses_full_config_file() {
        let reference = Configuration {
            directory: Some(PathBuf::from("/opt/deploy")),
            playbook: "site.yml".to_string(),
            key: PathBuf::from("/root/.ssh/id_rsa"),
            agent: false,
        };
        let conf = Configuration::read(Path::new("./tests/config/playbook-runner.conf")).unwrap();
        assert_eq!(reference, conf);
    }

    #[test]
    fn it_keeps_defaults_for_empty_values() {
        let conf = Configuration::parse("[Run]\nplaybook = site.yml\ndirectory =\n").unwrap();
        assert_eq!(conf.playbook, "site.yml".to_string());
        assert_eq!(conf.directory, None);
        assert!(conf.agent);
    }

    #[test]
    fn it_rejects_invalid_agent_values() {
        assert!(Configuration::parse("[Ssh]\nagent = maybe\n").is_err());
    }
}
