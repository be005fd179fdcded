// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # HTML Pages
//!
//! Puts rendered pages on disk. With minification on, each page goes
//! through `minify-html` first; inline CSS and JS are minified as well.
//!
//! ```rust,no_run
//! use hyde::generators::html::HtmlGenerator;
//! use hyde::OutputGenerator;
//! use std::path::Path;
//!
//! HtmlGenerator::new()
//!     .with_minification(true)
//!     .generate("<p>\n  Hello\n</p>", Path::new("output/about.html"))?;
//! # Ok::<(), hyde::HydeError>(())
//! ```

use std::path::Path;

use log::trace;
use minify_html::{minify, Cfg};

use crate::core::error::{HydeError, Result};
use crate::core::traits::OutputGenerator;
use crate::files::write_content;

/// Writes rendered pages into the output tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlGenerator {
    minify: bool,
}

impl HtmlGenerator {
    /// Pages are written exactly as rendered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns minification on or off.
    pub fn with_minification(mut self, enable: bool) -> Self {
        self.minify = enable;
        self
    }

    fn minified(page: &str, path: &Path) -> Result<String> {
        let cfg = Cfg {
            minify_css: true,
            minify_js: true,
            keep_comments: false,
            ..Cfg::default()
        };
        String::from_utf8(minify(page.as_bytes(), &cfg)).map_err(|e| {
            HydeError::output_error(
                "Minified page is not valid UTF-8",
                path.to_path_buf(),
                Some(Box::new(e)),
            )
        })
    }
}

impl OutputGenerator for HtmlGenerator {
    fn generate(&self, content: &str, path: &Path) -> Result<()> {
        if self.minify {
            let page = Self::minified(content, path)?;
            write_content(path, &page)?;
            trace!("Wrote {} ({} -> {} bytes)", path.display(), content.len(), page.len());
        } else {
            write_content(path, content)?;
            trace!("Wrote {} ({} bytes)", path.display(), content.len());
        }
        Ok(())
    }
}
