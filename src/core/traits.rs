// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Core Traits Module
//!
//! The build pipeline talks to its collaborators through these traits:
//!
//! - [`MarkdownConverter`]: turns a Markdown body into HTML
//! - [`TemplateRenderer`]: renders a named template with a JSON context
//! - [`OutputGenerator`]: writes a rendered page to disk
//!
//! The shipped implementations are
//! [`MarkdownProcessor`](crate::processors::markdown::MarkdownProcessor),
//! [`HandlebarsRenderer`](crate::template::HandlebarsRenderer) and
//! [`HtmlGenerator`](crate::generators::html::HtmlGenerator). Tests swap in
//! lightweight fakes.

use std::path::Path;

use serde_json::Value as JsonValue;

use crate::core::error::Result;

/// Converts Markdown text into HTML.
pub trait MarkdownConverter: Send + Sync + std::fmt::Debug {
    /// Converts `markdown` into an HTML fragment.
    fn convert(&self, markdown: &str) -> Result<String>;
}

/// Renders templates by name.
pub trait TemplateRenderer: Send + Sync + std::fmt::Debug {
    /// Renders `template` with the given context.
    ///
    /// # Arguments
    /// * `template` - The template file name, e.g. `post.html.hbs`.
    /// * `context` - The variables available to the template.
    fn render(&self, template: &str, context: &JsonValue) -> Result<String>;

    /// Whether a template with this name is known.
    fn has_template(&self, template: &str) -> bool;
}

/// Writes generated output.
pub trait OutputGenerator: Send + Sync + std::fmt::Debug {
    /// Writes `content` to `path`, creating parent directories as needed.
    fn generate(&self, content: &str, path: &Path) -> Result<()>;
}
