// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Page Model
//!
//! [`ContentPage`] is one parsed content file. [`IndexPage`] is one
//! generated page of a paginated content group. Both expose a [`PageUrl`],
//! which is always absolute and maps directly onto a path in the output
//! tree.
//!
//! URLs are derived from `(group, urlstub, page_number)` whenever they are
//! needed. A content page is never rewritten when it joins a group; the
//! grouped URL lives on the [`MemberPage`] handed out by the paginator.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::core::error::{HydeError, Result};
use crate::core::traits::MarkdownConverter;
use crate::files::read_content;
use crate::metadata::{self, Metadata};

/// An absolute site URL such as `/posts/index2.html`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageUrl(String);

impl PageUrl {
    /// Wraps `url`, rejecting anything that does not start with `/`.
    pub fn new<S: Into<String>>(url: S) -> Result<Self> {
        let url = url.into();
        if url.starts_with('/') {
            Ok(Self(url))
        } else {
            Err(HydeError::InvalidUrl { url })
        }
    }

    /// `/{urlstub}.html`
    pub fn for_page(urlstub: &str) -> Self {
        Self(format!("/{urlstub}.html"))
    }

    /// `/{group}/{urlstub}.html`
    pub fn for_member(group: &str, urlstub: &str) -> Self {
        Self(format!("/{group}/{urlstub}.html"))
    }

    /// `/{group}/index.html` for page 0, `/{group}/index{n+1}.html` after.
    pub fn for_index(group: &str, page_number: usize) -> Self {
        if page_number == 0 {
            Self(format!("/{group}/index.html"))
        } else {
            Self(format!("/{group}/index{}.html", page_number + 1))
        }
    }

    /// The URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Where this URL lives below `output_root`.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        output_root.join(self.0.trim_start_matches('/'))
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A parsed content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPage {
    /// Front matter.
    pub meta: Metadata,
    /// HTML rendered from the body, if the file had one.
    pub content: Option<String>,
    /// File the page was read from, if any.
    pub source: Option<PathBuf>,
}

impl ContentPage {
    /// A page built from already-parsed parts.
    pub fn new(meta: Metadata, content: Option<String>) -> Self {
        Self {
            meta,
            content,
            source: None,
        }
    }

    /// Reads and parses `path`. The content group is the name of the
    /// directory between `content_root` and the file, if there is one.
    pub fn from_file(
        path: &Path,
        content_root: &Path,
        converter: &dyn MarkdownConverter,
    ) -> Result<Self> {
        let group = content_group_for(path, content_root)?;
        let text = read_content(path).map_err(|e| match e {
            HydeError::Io { source, .. } if source.kind() == io::ErrorKind::InvalidData => {
                HydeError::metadata_error("file is not valid UTF-8", Some(Box::new(source)))
                    .with_path(path.to_path_buf())
            }
            other => other,
        })?;
        let (mut meta, content) = metadata::parse(&text, converter)
            .map_err(|e| e.with_path(path.to_path_buf()))?;
        meta.content_group = group;

        Ok(Self {
            meta,
            content,
            source: Some(path.to_path_buf()),
        })
    }

    /// The group this page belongs to, if any.
    pub fn content_group(&self) -> Option<&str> {
        self.meta.content_group.as_deref()
    }

    /// Standalone URL, `/{urlstub}.html`.
    pub fn url(&self) -> PageUrl {
        PageUrl::for_page(&self.meta.urlstub)
    }

    /// URL of this page as a member of `group`.
    pub fn url_in_group(&self, group: &str) -> PageUrl {
        PageUrl::for_member(group, &self.meta.urlstub)
    }

    /// URL this page is published under: grouped if it has a group.
    pub fn canonical_url(&self) -> PageUrl {
        match self.content_group() {
            Some(group) => self.url_in_group(group),
            None => self.url(),
        }
    }

    /// Template file name, `{template}.html.{extension}`.
    pub fn template_file(&self, extension: &str) -> String {
        format!("{}.html.{extension}", self.meta.template)
    }

    /// Template-facing view of this page served at `url`.
    pub fn view(&self, url: &PageUrl) -> PageView<'_> {
        PageView {
            meta: &self.meta,
            title: &self.meta.title,
            content: self.content.as_deref(),
            url: url.clone(),
        }
    }
}

/// Works out the content group of `path` below `content_root`.
fn content_group_for(path: &Path, content_root: &Path) -> Result<Option<String>> {
    let relative = path.strip_prefix(content_root).map_err(|_| {
        HydeError::config_error(
            format!("{} is outside the content directory", path.display()),
            Some(content_root.to_path_buf()),
        )
    })?;

    let dirs: Vec<_> = relative
        .parent()
        .map(|p| {
            p.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect()
        })
        .unwrap_or_default();

    match dirs.as_slice() {
        [] => Ok(None),
        [dir] => Ok(Some(dir.as_os_str().to_string_lossy().into_owned())),
        _ => Err(HydeError::NestedContent {
            path: path.to_path_buf(),
        }),
    }
}

/// A content page seen as a member of a group, carrying its grouped URL.
#[derive(Debug, Clone, Copy)]
pub struct MemberPage<'a> {
    /// The shared page.
    pub page: &'a ContentPage,
    url: &'a str,
}

/// A generated page of a content group's index.
#[derive(Debug, Clone)]
pub struct IndexPage<'a> {
    name: String,
    items: Vec<(&'a ContentPage, PageUrl)>,
    page_number: usize,
}

impl<'a> IndexPage<'a> {
    /// Index page `page_number` of group `name` holding `members`.
    pub fn new(name: &str, members: &[&'a ContentPage], page_number: usize) -> Self {
        Self {
            name: name.to_string(),
            items: members
                .iter()
                .map(|page| (*page, page.url_in_group(name)))
                .collect(),
            page_number,
        }
    }

    /// Group key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position in the group's index sequence.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Members on this page, in group order.
    pub fn items(&self) -> impl Iterator<Item = MemberPage<'_>> + '_ {
        self.items.iter().map(|(page, url)| MemberPage {
            page: *page,
            url: url.as_str(),
        })
    }

    /// Number of members on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no members.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `/{name}/index.html` or `/{name}/index{n+1}.html`.
    pub fn url(&self) -> PageUrl {
        PageUrl::for_index(&self.name, self.page_number)
    }

    /// Template-facing view of this index.
    pub fn view(&self) -> IndexView<'_> {
        IndexView {
            name: &self.name,
            page_number: self.page_number,
            url: self.url(),
            items: self
                .items
                .iter()
                .map(|(page, url)| page.view(url))
                .collect(),
        }
    }
}

impl MemberPage<'_> {
    /// Grouped URL, `/{group}/{urlstub}.html`.
    pub fn url(&self) -> PageUrl {
        PageUrl(self.url.to_string())
    }
}

/// What templates see as `page`.
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    /// Full front matter.
    pub meta: &'a Metadata,
    /// Shortcut for `meta.title`.
    pub title: &'a str,
    /// Rendered body HTML.
    pub content: Option<&'a str>,
    /// URL the page is served at.
    pub url: PageUrl,
}

/// What templates see as `index`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexView<'a> {
    /// Group key.
    pub name: &'a str,
    /// Zero-based page number.
    pub page_number: usize,
    /// URL of this index page.
    pub url: PageUrl,
    /// Members on this page.
    pub items: Vec<PageView<'a>>,
}
