// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use tracing::info;

pub const INVENTORY_SECTION: &str = "[myhosts]";

// A single host makes no sense for a playbook targeting a group
const MIN_HOSTS: usize = 2;

/// Split the hostname argument into individual hosts
pub fn parse_hosts(input: &str) -> Result<Vec<String>> {
    let hosts: Vec<String> = input.split_whitespace().map(str::to_owned).collect();
    if hosts.len() < MIN_HOSTS {
        bail!(
            "At least {MIN_HOSTS} server IPs or names are required, got {}",
            hosts.len()
        );
    }
    Ok(hosts)
}

/// The transient inventory consumed by ansible-playbook
pub struct Inventory {
    pub path: PathBuf,
}

impl Inventory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append a section with one `serverN` entry per host, in input order.
    ///
    /// Sections accumulate over successive runs, the file is only emptied
    /// at the end of a successful run.
    pub fn append(&self, hosts: &[String]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Opening inventory file '{}'", self.path.display()))?;
        writeln!(file, "{INVENTORY_SECTION}")?;
        for (i, host) in hosts.iter().enumerate() {
            let name = format!("server{}", i + 1);
            writeln!(file, "{name} ansible_host={host}")?;
            info!("Successfully added {name} to inventory file");
        }
        Ok(())
    }

    /// Truncate to zero length once the run is over
    pub fn clear(&self) -> Result<()> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Clearing inventory file '{}'", self.path.display()))?;
        info!("The inventory file has been cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn hosts(list: &[&str]) -> Vec<String> {
        list.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn it_parses_whitespace_separated_hosts() {
        assert_eq!(
            parse_hosts("10.0.0.1  web02\tdb03").unwrap(),
            hosts(&["10.0.0.1", "web02", "db03"])
        );
    }

    #[test]
    fn it_rejects_less_than_two_hosts() {
        let err = parse_hosts("10.0.0.1").unwrap_err();
        assert!(format!("{err}").contains("At least 2"));
        assert!(parse_hosts("").is_err());
    }

    #[test]
    fn it_writes_hosts_in_order() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::new(dir.path().join("inventory.ini"));
        inventory
            .append(&hosts(&["10.0.0.1", "web02", "db03"]))
            .unwrap();
        assert_eq!(
            read_to_string(&inventory.path).unwrap(),
            "[myhosts]\n\
             server1 ansible_host=10.0.0.1\n\
             server2 ansible_host=web02\n\
             server3 ansible_host=db03\n"
        );
    }

    #[test]
    fn it_appends_a_section_per_run() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::new(dir.path().join("inventory.ini"));
        inventory.append(&hosts(&["a", "b"])).unwrap();
        inventory.append(&hosts(&["c", "d"])).unwrap();
        assert_eq!(
            read_to_string(&inventory.path).unwrap(),
            "[myhosts]\n\
             server1 ansible_host=a\n\
             server2 ansible_host=b\n\
             [myhosts]\n\
             server1 ansible_host=c\n\
             server2 ansible_host=d\n"
        );
    }

    #[test]
    fn it_clears_the_inventory() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::new(dir.path().join("inventory.ini"));
        inventory.append(&hosts(&["a", "b"])).unwrap();
        inventory.clear().unwrap();
        assert_eq!(read_to_string(&inventory.path).unwrap(), "");
    }

    #[test]
    fn it_creates_an_empty_inventory_when_clearing_a_missing_one() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::new(dir.path().join("inventory.ini"));
        inventory.clear().unwrap();
        assert_eq!(read_to_string(&inventory.path).unwrap(), "");
    }

    #[test]
    fn it_reports_a_missing_inventory_directory() {
        let dir = TempDir::new().unwrap();
        let inventory = Inventory::new(dir.path().join("missing").join("inventory.ini"));
        let err = inventory.append(&hosts(&["a", "b"])).unwrap_err();
        assert!(format!("{err:#}").contains("Opening inventory file"));
    }
}
