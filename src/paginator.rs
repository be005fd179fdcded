// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Pagination
//!
//! A [`Paginator`] slices the members of a content group into
//! [`IndexPage`]s of at most `page_size` members each. The whole sequence is
//! computed up front; iterating moves a cursor over it, and the neighbour
//! accessors (`has_next`, `previous_index_page`, ...) describe the index
//! produced most recently.
//!
//! ```rust
//! use hyde::metadata::Metadata;
//! use hyde::page::ContentPage;
//! use hyde::paginator::Paginator;
//!
//! let pages: Vec<ContentPage> = ["a", "b", "c"]
//!     .iter()
//!     .map(|s| ContentPage::new(Metadata::new(*s, *s), None))
//!     .collect();
//! let members: Vec<&ContentPage> = pages.iter().collect();
//!
//! let mut paginator = Paginator::new("posts", &members, 2).unwrap();
//! let first = paginator.next().unwrap();
//! assert_eq!(first.url().as_str(), "/posts/index.html");
//! assert!(paginator.has_next());
//! assert!(!paginator.has_previous());
//! ```

use serde::Serialize;

use crate::core::error::{HydeError, Result};
use crate::page::{ContentPage, IndexPage, PageUrl};

/// Members per index page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Cursor over the index pages of one content group.
#[derive(Debug, Clone)]
pub struct Paginator<'a> {
    name: String,
    page_size: usize,
    indices: Vec<IndexPage<'a>>,
    /// Position of the index produced last, `None` before the first.
    current: Option<usize>,
}

impl<'a> Paginator<'a> {
    /// Paginates `members` of group `name`. `page_size` must be at least 1.
    /// An empty member list yields no index pages.
    pub fn new(name: &str, members: &[&'a ContentPage], page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(HydeError::config_error(
                format!("page size for group '{name}' must be at least 1"),
                None,
            ));
        }

        let indices = members
            .chunks(page_size)
            .enumerate()
            .map(|(number, slice)| IndexPage::new(name, slice, number))
            .collect();

        Ok(Self {
            name: name.to_string(),
            page_size,
            indices,
            current: None,
        })
    }

    /// Group key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members per index page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(members / page_size)`.
    pub fn number_of_pages(&self) -> usize {
        self.indices.len()
    }

    /// Every index page, regardless of the cursor.
    pub fn indices(&self) -> &[IndexPage<'a>] {
        &self.indices
    }

    /// Index produced most recently.
    pub fn current_index_page(&self) -> Option<&IndexPage<'a>> {
        self.current.map(|i| &self.indices[i])
    }

    /// Index before the one produced most recently.
    pub fn previous_index_page(&self) -> Option<&IndexPage<'a>> {
        self.current
            .and_then(|i| i.checked_sub(1))
            .map(|i| &self.indices[i])
    }

    /// Index after the one produced most recently.
    pub fn next_index_page(&self) -> Option<&IndexPage<'a>> {
        self.current.and_then(|i| self.indices.get(i + 1))
    }

    /// Whether the index produced most recently has a successor.
    pub fn has_next(&self) -> bool {
        self.next_index_page().is_some()
    }

    /// Whether the index produced most recently has a predecessor.
    pub fn has_previous(&self) -> bool {
        self.previous_index_page().is_some()
    }

    /// Snapshot of the cursor for templates.
    pub fn view(&self) -> PaginatorView<'_> {
        PaginatorView {
            name: &self.name,
            number_of_pages: self.number_of_pages(),
            page_number: self.current,
            has_next: self.has_next(),
            has_previous: self.has_previous(),
            previous_url: self.previous_index_page().map(IndexPage::url),
            next_url: self.next_index_page().map(IndexPage::url),
        }
    }
}

impl<'a> Iterator for Paginator<'a> {
    type Item = IndexPage<'a>;

    /// Produces the next index page. Past the end the cursor stays on the
    /// last index and `None` is returned.
    fn next(&mut self) -> Option<Self::Item> {
        let position = self.current.map_or(0, |i| i + 1);
        let index = self.indices.get(position)?.clone();
        self.current = Some(position);
        Some(index)
    }
}

/// What templates see as `paginator`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatorView<'a> {
    /// Group key.
    pub name: &'a str,
    /// Total index pages in the group.
    pub number_of_pages: usize,
    /// Page number of the current index.
    pub page_number: Option<usize>,
    /// Whether a next index exists.
    pub has_next: bool,
    /// Whether a previous index exists.
    pub has_previous: bool,
    /// URL of the previous index.
    pub previous_url: Option<PageUrl>,
    /// URL of the next index.
    pub next_url: Option<PageUrl>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn pages(stubs: &[&str]) -> Vec<ContentPage> {
        stubs
            .iter()
            .map(|s| {
                let mut meta = Metadata::new(format!("Title {s}"), *s);
                meta.content_group = Some("posts".to_string());
                ContentPage::new(meta, None)
            })
            .collect()
    }

    fn numbered(n: usize) -> Vec<ContentPage> {
        let stubs: Vec<String> = (0..n).map(|i| format!("p{i}")).collect();
        let refs: Vec<&str> = stubs.iter().map(String::as_str).collect();
        pages(&refs)
    }

    #[test]
    fn test_paginator_with_pages() {
        let pages = pages(&["test-title-stub", "test-post-2", "test-post-3"]);
        let members: Vec<_> = pages.iter().collect();
        let mut paginator = Paginator::new("posts", &members, 2).unwrap();
        assert_eq!(paginator.number_of_pages(), 2);

        let index = paginator.next().unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.page_number(), 0);
        assert_eq!(index.url().as_str(), "/posts/index.html");
        let urls: Vec<_> = index.items().map(|m| m.url().to_string()).collect();
        assert_eq!(urls, ["/posts/test-title-stub.html", "/posts/test-post-2.html"]);

        let index = paginator.next().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.page_number(), 1);
        assert_eq!(index.url().as_str(), "/posts/index2.html");
        let urls: Vec<_> = index.items().map(|m| m.url().to_string()).collect();
        assert_eq!(urls, ["/posts/test-post-3.html"]);

        assert!(paginator.next().is_none());
    }

    #[test]
    fn test_fewer_members_than_page_size() {
        let pages = numbered(3);
        let members: Vec<_> = pages.iter().collect();
        let mut paginator = Paginator::new("posts", &members, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(paginator.number_of_pages(), 1);
        assert_eq!(paginator.next().unwrap().len(), 3);
    }

    #[test]
    fn test_page_counts_and_slice_sums() {
        for n in 0..25 {
            for size in 1..8 {
                let pages = numbered(n);
                let members: Vec<_> = pages.iter().collect();
                let paginator = Paginator::new("posts", &members, size).unwrap();

                assert_eq!(paginator.number_of_pages(), n.div_ceil(size));
                let total: usize = paginator.map(|index| index.len()).sum();
                assert_eq!(total, n);
            }
        }
    }

    #[test]
    fn test_prev_next_links() {
        let pages = numbered(3);
        let members: Vec<_> = pages.iter().collect();
        let mut paginator = Paginator::new("posts", &members, 1).unwrap();

        assert!(!paginator.has_next());
        assert!(!paginator.has_previous());

        let _ = paginator.next();
        assert!(paginator.has_next());
        assert!(!paginator.has_previous());
        assert_eq!(
            paginator.next_index_page().unwrap().url().as_str(),
            "/posts/index2.html"
        );

        let _ = paginator.next();
        assert!(paginator.has_next());
        assert!(paginator.has_previous());
        assert_eq!(
            paginator.previous_index_page().unwrap().url().as_str(),
            "/posts/index.html"
        );
        assert_eq!(
            paginator.next_index_page().unwrap().url().as_str(),
            "/posts/index3.html"
        );

        let _ = paginator.next();
        assert!(!paginator.has_next());
        assert!(paginator.has_previous());

        // Exhaustion keeps describing the last index.
        assert!(paginator.next().is_none());
        assert_eq!(paginator.current_index_page().unwrap().page_number(), 2);
    }

    #[test]
    fn test_first_and_last_edges_for_many_sizes() {
        for n in 1..12 {
            let pages = numbered(n);
            let members: Vec<_> = pages.iter().collect();
            let mut paginator = Paginator::new("posts", &members, 3).unwrap();
            let total = paginator.number_of_pages();

            let mut seen = 0;
            while let Some(index) = paginator.next() {
                let first = index.page_number() == 0;
                let last = index.page_number() + 1 == total;
                assert_eq!(paginator.has_previous(), !first);
                assert_eq!(paginator.has_next(), !last);
                seen += 1;
            }
            assert_eq!(seen, total);
        }
    }

    #[test]
    fn test_empty_group_yields_nothing() {
        let mut paginator = Paginator::new("posts", &[], 10).unwrap();
        assert_eq!(paginator.number_of_pages(), 0);
        assert!(paginator.next().is_none());
        assert!(paginator.current_index_page().is_none());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let pages = numbered(2);
        let members: Vec<_> = pages.iter().collect();
        assert!(Paginator::new("posts", &members, 0).is_err());
    }

    #[test]
    fn test_repeated_pagination_never_double_prefixes() {
        let pages = pages(&["test-title-stub", "test-post-2"]);
        let members: Vec<_> = pages.iter().collect();

        let _first = Paginator::new("posts", &members, 10).unwrap();
        let mut second = Paginator::new("posts", &members, 10).unwrap();

        let urls: Vec<_> = second
            .next()
            .unwrap()
            .items()
            .map(|m| m.url().to_string())
            .collect();
        assert_eq!(urls, ["/posts/test-title-stub.html", "/posts/test-post-2.html"]);
        assert_eq!(pages[0].url().as_str(), "/test-title-stub.html");
    }

    #[test]
    fn test_view_serializes_links() {
        let pages = numbered(2);
        let members: Vec<_> = pages.iter().collect();
        let mut paginator = Paginator::new("posts", &members, 1).unwrap();
        let _ = paginator.next();

        let view = serde_json::to_value(paginator.view()).unwrap();
        assert_eq!(view["numberOfPages"], 2);
        assert_eq!(view["hasNext"], true);
        assert_eq!(view["hasPrevious"], false);
        assert_eq!(view["nextUrl"], "/posts/index2.html");
        assert!(view["previousUrl"].is_null());
    }
}
