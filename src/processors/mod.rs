// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Body converters used while parsing content files.
//!
//! [`MarkdownProcessor`] is the built-in one. Anything implementing
//! [`MarkdownConverter`](crate::MarkdownConverter) can replace it through
//! [`Site::with_converter`](crate::Site::with_converter):
//!
//! ```rust
//! # use hyde::MarkdownConverter;
//! # use hyde::core::error::Result;
//! #[derive(Debug)]
//! struct Verbatim;
//!
//! impl MarkdownConverter for Verbatim {
//!     fn convert(&self, markdown: &str) -> Result<String> {
//!         Ok(format!("<pre>{markdown}</pre>"))
//!     }
//! }
//! ```

/// Markdown to HTML.
pub mod markdown;

pub use markdown::{Extension, MarkdownProcessor};
