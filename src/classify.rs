// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Content Classification
//!
//! Splits the pages of a build into single pages, linked directly from the
//! navigation, and content groups, which are paginated. Order is the order
//! pages were discovered in; groups appear in the order their first member
//! was seen.

use std::collections::HashMap;

use crate::page::ContentPage;

/// Pages sharing a content group key.
#[derive(Debug, Clone)]
pub struct ContentGroup<'a> {
    /// Group key, the name of the content subdirectory.
    pub name: String,
    /// Members in discovery order.
    pub pages: Vec<&'a ContentPage>,
}

/// Result of [`classify`].
#[derive(Debug, Clone, Default)]
pub struct Classified<'a> {
    /// Pages without a group, in discovery order.
    pub singles: Vec<&'a ContentPage>,
    /// Groups, first-seen key first.
    pub groups: Vec<ContentGroup<'a>>,
}

impl Classified<'_> {
    /// Total number of pages across singles and groups.
    pub fn len(&self) -> usize {
        self.singles.len() + self.groups.iter().map(|g| g.pages.len()).sum::<usize>()
    }

    /// Whether no pages were classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions `pages` into singles and groups. Every page lands in exactly
/// one of the two.
pub fn classify(pages: &[ContentPage]) -> Classified<'_> {
    let mut classified = Classified::default();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for page in pages {
        match page.content_group() {
            None => classified.singles.push(page),
            Some(key) => {
                let position = *positions.entry(key).or_insert_with(|| {
                    classified.groups.push(ContentGroup {
                        name: key.to_string(),
                        pages: Vec::new(),
                    });
                    classified.groups.len() - 1
                });
                classified.groups[position].pages.push(page);
            }
        }
    }

    classified
}
