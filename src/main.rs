// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Hyde CLI
//!
//! Entry point of the `hyde` binary. It initializes the logger from the
//! verbosity flags and dispatches to [`hyde::cli::execute`]. Any fatal
//! error is printed and the process exits with status 1.

use anyhow::Context;
use clap::ArgMatches;
use log::debug;

use hyde::cli;

/// Installs `env_logger`. `RUST_LOG` wins over the `-v` flags.
fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let command = matches.subcommand_name().unwrap_or_default();
    debug!("Running `hyde {command}` (v{})", cli::VERSION);
    cli::execute(matches).with_context(|| format!("`hyde {command}` failed"))
}

/// The main entry point for the Hyde CLI.
fn main() {
    let matches = cli::build().get_matches();
    init_logger(matches.get_count("verbose"));

    if let Err(err) = run(&matches) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
