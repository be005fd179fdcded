// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Hyde Library
//!
//! Hyde turns a directory of Markdown files with YAML front matter into a
//! static HTML site. Pages directly inside `content/` become navigable
//! single pages; pages inside one subdirectory form a content group that is
//! published under `/<group>/` with paginated index pages.
//!
//! ```rust,no_run
//! use hyde::{ConfigBuilder, Site};
//!
//! let config = ConfigBuilder::new("my-site").build()?;
//! let report = Site::new(config).generate()?;
//! println!("{}", report.summary());
//! # Ok::<(), hyde::HydeError>(())
//! ```

#![doc = include_str!("../README.md")]
#![crate_name = "hyde"]
#![crate_type = "lib"]

/// Module containing configuration, errors and collaborator traits.
pub mod core;

/// Provides command-line interface utilities.
pub mod cli;

/// Splits pages into singles and content groups.
pub mod classify;

/// Filesystem helpers.
pub mod files;

/// Provides output generation utilities.
pub mod generators;

/// Front matter parsing.
pub mod metadata;

/// Navigation fragment construction.
pub mod navigation;

/// Page model and URLs.
pub mod page;

/// Index page pagination.
pub mod paginator;

/// Provides content processing utilities.
pub mod processors;

/// `hyde new` project scaffolding.
pub mod scaffold;

/// Development server.
pub mod server;

/// Build orchestration.
pub mod site;

/// Provides template rendering utilities.
pub mod template;

pub use crate::core::config::{Config, ConfigBuilder, ErrorPolicy};
pub use crate::core::error::{HydeError, Result};
pub use crate::core::traits::{MarkdownConverter, OutputGenerator, TemplateRenderer};
pub use crate::page::{ContentPage, IndexPage, PageUrl};
pub use crate::paginator::Paginator;
pub use crate::site::{BuildReport, Site};
