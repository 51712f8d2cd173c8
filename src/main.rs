// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

use std::process;

fn main() {
    if playbook_runner::run().is_err() {
        process::exit(1);
    }
}
