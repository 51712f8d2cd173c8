// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::path::PathBuf;

use clap::Parser;

/// Write an Ansible inventory for the given hosts and run the playbook against it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// IP addresses or names of the servers, whitespace-separated
    #[arg(short = 'H', long)]
    pub hostname: String,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the playbook without starting an SSH agent
    #[arg(short, long)]
    pub no_agent: bool,

    /// Install root containing the ansible_run directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Enable verbose logs
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable non-error logs
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn it_requires_the_hostname_option() {
        Args::command().debug_assert();
        assert!(Args::try_parse_from(["playbook-runner"]).is_err());
        let args =
            Args::try_parse_from(["playbook-runner", "-H", "10.0.0.1 10.0.0.2"]).unwrap();
        assert_eq!(args.hostname, "10.0.0.1 10.0.0.2");
        assert!(!args.no_agent);
    }
}
