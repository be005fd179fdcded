// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Error Handling for Hyde
//!
//! This module defines the error type shared by every stage of the build
//! pipeline. The `thiserror` crate derives the `Display` and `Error`
//! implementations so that each variant renders as a readable log line.

use std::path::PathBuf;
use thiserror::Error;

/// A unified result type for the Hyde library.
pub type Result<T> = std::result::Result<T, HydeError>;

/// Boxed source error attached to some variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for Hyde.
///
/// Variants fall in two families. Project-level problems (validation,
/// configuration, filesystem) always stop a build. Per-file and per-page
/// problems (metadata, nesting, templates) are governed by the configured
/// [`ErrorPolicy`](crate::core::config::ErrorPolicy); see
/// [`HydeError::is_recoverable`].
#[derive(Error, Debug)]
pub enum HydeError {
    /// The project layout is unusable. Every problem found is listed.
    #[error("Invalid Hyde project:\n{}", format_problems(.errors))]
    Validation {
        /// One human-readable line per problem.
        errors: Vec<String>,
    },

    /// A configuration file or value could not be used.
    #[error("Configuration error: {message}.")]
    Config {
        /// Detailed description of the configuration error.
        message: String,
        /// Optional path of the configuration file that caused the error.
        path: Option<PathBuf>,
    },

    /// A content file's front matter could not be turned into metadata.
    #[error("Metadata error in {}: {message}", display_path(.path))]
    Metadata {
        /// What went wrong.
        message: String,
        /// The content file, when known.
        path: Option<PathBuf>,
        /// Underlying decoder error, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// A content file sits more than one directory below the content root.
    #[error("Nested content not supported: `{path:?}`")]
    NestedContent {
        /// The offending file.
        path: PathBuf,
    },

    /// A page URL did not start with `/`.
    #[error("Page URL must be absolute, got `{url}`")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// A template is missing or failed to render.
    #[error("Template rendering error: {message} in template `{template}`.")]
    Template {
        /// Description of the template rendering error.
        message: String,
        /// The template file name associated with the error.
        template: String,
        /// Optional source error providing additional context, if available.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Two pages of one build would be written to the same URL.
    #[error("Duplicate output path `{url}`, already written by an earlier page")]
    DuplicateOutput {
        /// The contested URL.
        url: String,
    },

    /// A page would be written where static assets are copied.
    #[error("Output path `{url}` is reserved for static assets")]
    ReservedOutput {
        /// The rejected URL.
        url: String,
    },

    /// Writing the generated site failed.
    #[error("Output generation error: {message} at {path:?}.")]
    Output {
        /// Description of the output generation error.
        message: String,
        /// Path associated with the error.
        path: PathBuf,
        /// Optional source error providing additional context, if available.
        #[source]
        source: Option<BoxedSource>,
    },

    /// IO error encountered during file operations.
    #[error("File IO error at `{path:?}`: {source}")]
    Io {
        /// Path associated with the IO error.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The development server or file watcher failed.
    #[error("Server error: {0}")]
    Server(String),
}

impl From<std::io::Error> for HydeError {
    /// Converts a standard IO error into a `HydeError::Io` with an empty path.
    fn from(source: std::io::Error) -> Self {
        HydeError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl HydeError {
    /// Creates a `Validation` error from a list of problems.
    pub fn validation(errors: Vec<String>) -> Self {
        HydeError::Validation { errors }
    }

    /// Creates a `Config` error with a specific message.
    pub fn config_error<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
    ) -> Self {
        HydeError::Config {
            message: message.into(),
            path,
        }
    }

    /// Creates a `Metadata` error, optionally wrapping the decoder error.
    pub fn metadata_error<S: Into<String>>(
        message: S,
        source: Option<BoxedSource>,
    ) -> Self {
        HydeError::Metadata {
            message: message.into(),
            path: None,
            source,
        }
    }

    /// Creates a `Template` error for the given template file name.
    pub fn template_error<S: Into<String>>(
        message: S,
        template: &str,
        source: Option<BoxedSource>,
    ) -> Self {
        HydeError::Template {
            message: message.into(),
            template: template.to_string(),
            source,
        }
    }

    /// Creates an `Output` error for a path.
    pub fn output_error<S: Into<String>>(
        message: S,
        path: PathBuf,
        source: Option<BoxedSource>,
    ) -> Self {
        HydeError::Output {
            message: message.into(),
            path,
            source,
        }
    }

    /// Wraps an IO error with the path it happened on.
    pub fn io_error(path: PathBuf, source: std::io::Error) -> Self {
        HydeError::Io { path, source }
    }

    /// Attaches the content file path to a `Metadata` error. Other variants
    /// are returned unchanged.
    pub fn with_path(self, file: PathBuf) -> Self {
        match self {
            HydeError::Metadata {
                message, source, ..
            } => HydeError::Metadata {
                message,
                path: Some(file),
                source,
            },
            other => other,
        }
    }

    /// Whether the error concerns a single file or page, so that the build
    /// may continue without it under the `skip` policy.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HydeError::Metadata { .. }
                | HydeError::NestedContent { .. }
                | HydeError::Template { .. }
                | HydeError::DuplicateOutput { .. }
                | HydeError::ReservedOutput { .. }
        )
    }
}

fn format_problems(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("\tE: {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map_or_else(|| "<input>".to_string(), |p| p.display().to_string())
}
