// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

mod agent;
mod cli;
mod cmd;
mod config;
mod inventory;
mod logs;
mod paths;

use std::{env, path::Path, process::Command};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, warn};

use crate::{
    agent::SshAgent,
    cli::Args,
    cmd::run_inherited,
    config::Configuration,
    inventory::{parse_hosts, Inventory},
    paths::{install_root, run_dir, INVENTORY_FILE, PATH_MARKER},
};

pub const CONFIG_PATH: &str = "/etc/playbook-runner.conf";
const ANSIBLE_PLAYBOOK_BIN: &str = "ansible-playbook";

/// CLI entry point
pub fn run() -> Result<()> {
    // Read CLI args
    let args = cli::Args::parse();

    // Setup logger early
    logs::init(args.verbose, args.quiet, logs::OutputFormat::Human)?;
    debug!(
        "Running {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let r = run_inner(args);
    if let Err(ref e) = r {
        error!("{:#}", e);
    }
    r
}

pub fn run_inner(args: Args) -> Result<()> {
    debug!("Parsed CLI arguments: {args:?}");
    let cfg = match &args.config {
        Some(path) => Configuration::read(path)
            .with_context(|| format!("Reading configuration from '{}'", path.display()))?,
        None => {
            // The default configuration file is optional
            let path = Path::new(CONFIG_PATH);
            if path.exists() {
                Configuration::read(path)
                    .with_context(|| format!("Reading configuration from '{}'", path.display()))?
            } else {
                Configuration::default()
            }
        }
    };
    debug!("Parsed configuration: {cfg:?}");

    let hosts = parse_hosts(&args.hostname)?;

    let root = match args.root.or_else(|| cfg.directory.clone()) {
        Some(root) => root,
        None => {
            let exe = env::current_exe().context("Resolving the running executable path")?;
            install_root(&exe, PATH_MARKER)
        }
    };
    let run_dir = run_dir(&root);
    let playbook = run_dir.join(&cfg.playbook);
    let inventory = Inventory::new(run_dir.join(INVENTORY_FILE));
    debug!("Using playbook '{}'", playbook.display());

    inventory.append(&hosts)?;

    // Locate ansible before touching the agent
    let ansible = which::which(ANSIBLE_PLAYBOOK_BIN)
        .with_context(|| format!("Could not find '{ANSIBLE_PLAYBOOK_BIN}' in PATH"))?;

    let agent = if cfg.agent && !args.no_agent {
        let agent = SshAgent::start()?;
        agent.add_key(&cfg.key)?;
        Some(agent)
    } else {
        None
    };

    let mut cmd = Command::new(ansible);
    cmd.arg(&playbook)
        .arg("-i")
        .arg(&inventory.path)
        .arg("--ask-become-pass");
    if let Some(ref agent) = agent {
        cmd.envs(agent.vars());
    }
    run_inherited(&mut cmd).context("Running ansible-playbook")?;

    if let Some(agent) = agent {
        // The run itself succeeded, a leftover agent is not fatal
        if let Err(e) = agent.kill() {
            warn!("{:#}", e);
        }
    }

    inventory.clear()?;
    Ok(())
}
