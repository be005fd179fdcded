// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Navigation
//!
//! The navigation fragment links every single page and the first index page
//! of every content group. It is rendered once per build and reused by every
//! later page render as the `navigation` variable.

use serde::Serialize;
use serde_json::json;

use crate::classify::Classified;
use crate::core::config::SiteConfig;
use crate::core::error::Result;
use crate::core::traits::TemplateRenderer;
use crate::page::PageUrl;
use crate::paginator::Paginator;

/// One link in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    /// Link text: the page title, or the group key for groups.
    pub title: String,
    /// Link target.
    pub url: PageUrl,
}

/// Singles in discovery order, followed by one entry per group pointing at
/// its first index page.
pub fn navigation_entries(classified: &Classified<'_>, page_size: usize) -> Result<Vec<NavEntry>> {
    let mut entries: Vec<NavEntry> = classified
        .singles
        .iter()
        .map(|page| NavEntry {
            title: page.meta.title.clone(),
            url: page.url(),
        })
        .collect();

    for group in &classified.groups {
        let paginator = Paginator::new(&group.name, &group.pages, page_size)?;
        if let Some(first) = paginator.indices().first() {
            entries.push(NavEntry {
                title: group.name.clone(),
                url: first.url(),
            });
        }
    }
    Ok(entries)
}

/// Renders the navigation fragment with `{ site, entries }`.
pub fn build_navigation(
    classified: &Classified<'_>,
    page_size: usize,
    renderer: &dyn TemplateRenderer,
    template_file: &str,
    site: &SiteConfig,
) -> Result<String> {
    let entries = navigation_entries(classified, page_size)?;
    renderer.render(template_file, &json!({ "site": site, "entries": entries }))
}
