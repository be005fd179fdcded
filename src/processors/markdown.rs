// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Markdown Bodies
//!
//! Turns the body of a content file into an HTML fragment with
//! `pulldown-cmark`. Front matter never reaches this module; [`crate::metadata`]
//! splits it off first.
//!
//! ```rust
//! use hyde::processors::markdown::{Extension, MarkdownProcessor};
//! use hyde::MarkdownConverter;
//!
//! let processor = MarkdownProcessor::new().enable(Extension::Strikethrough);
//! let html = processor.convert("# Hello\n\n~~gone~~").unwrap();
//! assert_eq!(html, "<h1>Hello</h1>\n<p><del>gone</del></p>\n");
//! ```

use pulldown_cmark::{html, Options, Parser};

use crate::core::{error::Result, traits::MarkdownConverter};

/// Optional Markdown syntax on top of CommonMark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// GitHub-style pipe tables.
    Tables,
    /// `~~struck~~` text.
    Strikethrough,
    /// `[^note]` references with a footnote section.
    Footnotes,
    /// `- [x]` checkboxes in lists.
    TaskLists,
    /// Curly quotes, dashes and ellipses.
    SmartPunctuation,
}

impl Extension {
    /// Extensions enabled for site builds.
    pub const SITE: [Self; 3] = [Self::Tables, Self::Strikethrough, Self::Footnotes];

    fn option(self) -> Options {
        match self {
            Self::Tables => Options::ENABLE_TABLES,
            Self::Strikethrough => Options::ENABLE_STRIKETHROUGH,
            Self::Footnotes => Options::ENABLE_FOOTNOTES,
            Self::TaskLists => Options::ENABLE_TASKLISTS,
            Self::SmartPunctuation => Options::ENABLE_SMART_PUNCTUATION,
        }
    }
}

/// Converts Markdown bodies to HTML.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    /// Plain CommonMark.
    pub fn new() -> Self {
        Self {
            options: Options::empty(),
        }
    }

    /// The processor [`Site`](crate::Site) uses unless told otherwise.
    pub fn for_site() -> Self {
        Extension::SITE
            .into_iter()
            .fold(Self::new(), Self::enable)
    }

    /// Turns on one extension.
    pub fn enable(mut self, extension: Extension) -> Self {
        self.options.insert(extension.option());
        self
    }

    /// Turns off one extension.
    pub fn disable(mut self, extension: Extension) -> Self {
        self.options.remove(extension.option());
        self
    }

    /// Whether `extension` is on.
    pub fn is_enabled(&self, extension: Extension) -> bool {
        self.options.contains(extension.option())
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::for_site()
    }
}

impl MarkdownConverter for MarkdownProcessor {
    fn convert(&self, markdown: &str) -> Result<String> {
        let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut out, Parser::new_ext(markdown, self.options));
        Ok(out)
    }
}
