// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line interface for Hyde
//!
//! Argument parsing and command dispatch for the `hyde` binary.
//!
//! # Examples
//!
//! ```
//! use hyde::cli;
//!
//! let matches = cli::build().get_matches_from(vec![
//!     "hyde",
//!     "-d",
//!     "my-site",
//!     "gen",
//!     "--strict",
//! ]);
//!
//! let gen_cmd = matches.subcommand_matches("gen").unwrap();
//! assert!(gen_cmd.get_flag("strict"));
//! ```

use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, info, warn};

use crate::core::config::{Config, ConfigBuilder, ENV_PREFIX};
use crate::core::error::{HydeError, Result};
use crate::scaffold::create_project;
use crate::server;
use crate::site::Site;
use crate::template::HandlebarsRenderer;

/// The current version of Hyde, as defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds and configures the Hyde command-line interface.
pub fn build() -> Command {
    Command::new("hyde")
        .author("Hyde Contributors")
        .about("A static site generator for Markdown content with YAML front matter.")
        .version(VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("directory")
                .short('d')
                .long("directory")
                .help("Hyde project directory")
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .global(true),
        )
        .subcommand(
            Command::new("new")
                .about("Create a new Hyde website")
                .arg(
                    Arg::new("dir")
                        .help("Directory to create the project in")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("check").about("Check that the directory is a valid Hyde project"))
        .subcommand(
            Command::new("gen")
                .about("Generate the static site")
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Abort on the first file or page that fails")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the site locally and rebuild on changes")
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .help("Port to serve on [default: 8000]")
                        .value_parser(value_parser!(u16)),
                )
                .arg(
                    Arg::new("address")
                        .short('a')
                        .long("address")
                        .help("Address to bind [default: 127.0.0.1]")
                        .value_parser(value_parser!(String)),
                ),
        )
        .after_help(
            "\x1b[1;4mLicense:\x1b[0m\n  The project is licensed under the terms of \
             both the MIT license and the Apache License (Version 2.0).",
        )
}

/// Runs the subcommand selected in `matches`.
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let project_dir = matches
        .get_one::<PathBuf>("directory")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    debug!("Project directory: {}", project_dir.display());

    match matches.subcommand() {
        Some(("new", sub_matches)) => {
            let dir = sub_matches
                .get_one::<PathBuf>("dir")
                .ok_or_else(|| HydeError::config_error("missing project directory", None))?;
            new_project(dir)
        }
        Some(("check", _)) => check_project(&project_dir),
        Some(("gen", sub_matches)) => {
            let mut builder = config_builder(&project_dir);
            if sub_matches.get_flag("strict") {
                builder = builder.with_override("build.on_error", "abort");
            }
            generate_site(builder.build()?)
        }
        Some(("serve", sub_matches)) => {
            let mut builder = config_builder(&project_dir);
            if let Some(port) = sub_matches.get_one::<u16>("port") {
                builder = builder.with_override("server.port", port);
            }
            if let Some(address) = sub_matches.get_one::<String>("address") {
                builder = builder.with_override("server.address", address);
            }
            serve_site(builder.build()?)
        }
        _ => Err(HydeError::config_error("Unknown command", None)),
    }
}

fn config_builder(project_dir: &Path) -> ConfigBuilder {
    ConfigBuilder::new(project_dir).with_env_prefix(ENV_PREFIX)
}

fn new_project(dir: &Path) -> Result<()> {
    let written = create_project(dir)?;
    info!("Created {} files", written.len());
    println!("Done! Run `hyde -d {} gen` to build the site.", dir.display());
    Ok(())
}

fn check_project(project_dir: &Path) -> Result<()> {
    let config = config_builder(project_dir).build()?;
    config.validate_layout()?;
    let renderer =
        HandlebarsRenderer::new(&config.template_path(), &config.build.template_extension)?;

    for stem in [&config.build.index_template, &config.build.navbar_template] {
        let file = config.template_file(stem);
        if !renderer.template_names().any(|name| name == file) {
            warn!("Template {file} is missing; group indexes or navigation will fail");
        }
    }

    let site = Site::new(config);
    let content_files = site.discover()?.len();
    println!(
        "Looks like '{}' is a valid Hyde project! ({} templates, {} content files)",
        project_dir.display(),
        renderer.template_names().count(),
        content_files
    );
    Ok(())
}

fn generate_site(config: Config) -> Result<()> {
    let report = Site::new(config).generate()?;
    if !report.is_clean() {
        warn!("{report}");
    }
    println!("{}", report.summary());
    Ok(())
}

fn serve_site(config: Config) -> Result<()> {
    let address = config.server.address.clone();
    let port = config.server.port;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| HydeError::Server(format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(server::serve(Site::new(config), &address, port))
}
