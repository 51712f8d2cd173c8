// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::path::{Component, Path, PathBuf};

/// Path segment anchoring install-root resolution in the executable path
pub const PATH_MARKER: &str = "target";

pub const RUN_DIR: &str = "ansible_run";
pub const PLAYBOOK_FILE: &str = "playbook.yml";
pub const INVENTORY_FILE: &str = "inventory.ini";

/// Install root of the running program.
///
/// Everything before the first marker segment of the executable path, or
/// the executable's directory when the marker does not appear in it.
pub fn install_root(exe: &Path, marker: &str) -> PathBuf {
    let mut root = PathBuf::new();
    for component in exe.components() {
        if let Component::Normal(c) = component {
            if c.to_str() == Some(marker) {
                return root;
            }
        }
        root.push(component.as_os_str());
    }
    match exe.parent() {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("/"),
    }
}

/// Directory holding the playbook and the inventory
pub fn run_dir(root: &Path) -> PathBuf {
    root.join(RUN_DIR)
}
