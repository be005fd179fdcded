// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Front Matter Parsing
//!
//! A content file is a YAML header followed by a Markdown body, separated by
//! `---`:
//!
//! ```text
//! title: Test post
//! urlstub: test-post
//! date: 2021-03-01
//! ---
//! # Welcome to hyde
//! ```
//!
//! Only the header and the body up to the next separator are significant.
//! A file may also open with a `---` fence, in which case the fence is
//! skipped first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::{HydeError, Result};
use crate::core::traits::MarkdownConverter;

/// Token separating the front matter from the body.
pub const METADATA_SEPARATOR: &str = "---";

/// Template used when the front matter names none.
pub const DEFAULT_TEMPLATE: &str = "post";

/// Typed front matter of a content page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Page title. Required, non-empty.
    pub title: String,

    /// File name stem used to build the page URL. Required, non-empty.
    pub urlstub: String,

    /// Group the page belongs to. Derived from the content directory the
    /// file lives in, never read from the header.
    #[serde(rename = "contentGroup", default, skip_deserializing)]
    pub content_group: Option<String>,

    /// Template stem, rendered as `{template}.html.<ext>`.
    #[serde(default = "default_template")]
    pub template: String,

    /// Draft flag, passed through to templates.
    #[serde(default)]
    pub draft: bool,

    /// Publication date.
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Author name.
    #[serde(default)]
    pub author: Option<String>,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Metadata {
    /// Metadata with the required fields set and defaults elsewhere.
    pub fn new<T: Into<String>, U: Into<String>>(title: T, urlstub: U) -> Self {
        Self {
            title: title.into(),
            urlstub: urlstub.into(),
            content_group: None,
            template: default_template(),
            draft: false,
            date: None,
            author: None,
        }
    }

    /// Decodes a YAML header into validated metadata.
    pub fn from_yaml(header: &str) -> Result<Self> {
        let meta: Metadata = serde_yml::from_str(header).map_err(|e| {
            HydeError::metadata_error(
                format!("Couldn't parse metadata: {e}"),
                Some(Box::new(e)),
            )
        })?;
        meta.validated()
    }

    fn validated(mut self) -> Result<Self> {
        self.title = self.title.trim().to_string();
        self.urlstub = self.urlstub.trim().to_string();
        self.template = self.template.trim().to_string();

        for (field, value) in [("title", &self.title), ("urlstub", &self.urlstub)] {
            if value.is_empty() {
                return Err(HydeError::metadata_error(
                    format!("required field `{field}` is empty"),
                    None,
                ));
            }
        }
        if self.urlstub.contains('/') {
            return Err(HydeError::metadata_error(
                format!("urlstub `{}` must not contain '/'", self.urlstub),
                None,
            ));
        }
        if self.template.is_empty() {
            self.template = default_template();
        }
        Ok(self)
    }
}

/// Splits raw file text into its header and optional body.
///
/// The text is split on [`METADATA_SEPARATOR`] into at most three pieces;
/// the third piece, if any, is discarded.
pub fn split_front_matter(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_start();
    let text = match trimmed.strip_prefix(METADATA_SEPARATOR) {
        Some(rest) if rest.starts_with('\n') || rest.starts_with("\r\n") => rest,
        _ => text,
    };

    let mut segments = text.splitn(3, METADATA_SEPARATOR);
    let header = segments.next().unwrap_or_default();
    let body = segments.next();
    (header, body)
}

/// Parses a content file into metadata and the HTML of its body.
///
/// A missing body yields `None`; it is not an error.
pub fn parse(
    text: &str,
    converter: &dyn MarkdownConverter,
) -> Result<(Metadata, Option<String>)> {
    let (header, body) = split_front_matter(text);
    let meta = Metadata::from_yaml(header)?;
    let content = body.map(|b| converter.convert(b)).transpose()?;
    Ok((meta, content))
}
