// SPDX-License-Identifier: GPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Normation SAS

//! Output of the wrapper
//!
//! The style is heavily inspired from cargo/rustc.

use std::{
    env,
    fmt::{Display, Formatter},
    io,
    str::FromStr,
};

use anyhow::{bail, Error, Result};
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Human => "human",
                Self::Json => "json",
            }
        )
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "human" => Self::Human,
            _ => bail!("Unrecognized output format '{s}'"),
        })
    }
}

pub fn init(verbose: u8, quiet: bool, format: OutputFormat) -> Result<()> {
    let level = match (verbose, quiet) {
        (0, true) => LevelFilter::WARN,
        (0, false) => LevelFilter::INFO,
        (1, _) => LevelFilter::DEBUG,
        (_, _) => LevelFilter::TRACE,
    };
    let no_color = env::var("NO_COLOR").is_ok();

    // Formatters
    let stderr_fmt = fmt::format()
        .compact()
        .without_time()
        .with_target(false)
        .with_ansi(!no_color);
    let json_fmt = fmt::format().without_time().with_target(false).json();

    // Layers
    let human = tracing_subscriber::fmt::layer()
        .event_format(stderr_fmt)
        .with_writer(io::stderr)
        .with_filter(
            EnvFilter::builder()
                .from_env_lossy()
                .add_directive(level.into()),
        );

    let json = if format == OutputFormat::Json {
        Some(
            tracing_subscriber::fmt::layer()
                .event_format(json_fmt)
                .with_filter(
                    EnvFilter::builder()
                        .from_env_lossy()
                        .add_directive(level.into()),
                ),
        )
    } else {
        None
    };

    let logger = tracing_subscriber::registry().with(human).with(json);
    tracing::subscriber::set_global_default(logger)?;
    Ok(())
}
