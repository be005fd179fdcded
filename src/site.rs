// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Build Orchestration
//!
//! [`Site`] runs a full build of one project:
//!
//! 1. validate the layout,
//! 2. discover and parse content files,
//! 3. classify pages into singles and groups,
//! 4. render the navigation fragment once,
//! 5. render single pages, index pages and group members into memory,
//! 6. write everything into a staging directory, copy `static/`, and swap
//!    the staging tree into place as the new output directory.
//!
//! Per-file and per-page failures follow the configured
//! [`ErrorPolicy`]. A failed build leaves the previous output untouched.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde_json::json;
use walkdir::WalkDir;

use crate::classify::{classify, Classified};
use crate::core::config::{Config, ErrorPolicy};
use crate::core::error::{HydeError, Result};
use crate::core::traits::{MarkdownConverter, OutputGenerator, TemplateRenderer};
use crate::files::copy_tree;
use crate::generators::HtmlGenerator;
use crate::navigation::build_navigation;
use crate::page::{ContentPage, PageUrl};
use crate::paginator::Paginator;
use crate::processors::MarkdownProcessor;
use crate::template::HandlebarsRenderer;

/// Prefix of the staging directory created next to the output directory.
pub const STAGING_PREFIX: &str = ".hyde-staging";

/// Subdirectory copied static assets land in.
pub const STATIC_OUTPUT_DIR: &str = "static";

const CONTENT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// A file or page left out of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFailure {
    /// Content file path or page URL.
    pub subject: String,
    /// Why it was left out.
    pub reason: String,
}

/// Outcome of a successful build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Pages written to the output directory.
    pub pages_written: usize,
    /// Static files copied.
    pub static_files: usize,
    /// Files and pages skipped under the `skip` policy.
    pub failures: Vec<BuildFailure>,
    /// Wall time of the build.
    pub duration: Duration,
}

impl BuildReport {
    /// Whether nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} pages written, {} static files copied, {} skipped in {:.2?}",
            self.pages_written,
            self.static_files,
            self.failures.len(),
            self.duration
        )
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())?;
        for failure in &self.failures {
            write!(f, "\n\tskipped {}: {}", failure.subject, failure.reason)?;
        }
        Ok(())
    }
}

/// A page rendered in memory, waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Where the page is served.
    pub url: PageUrl,
    /// Final HTML.
    pub html: String,
}

/// One Hyde project and the collaborators used to build it.
#[derive(Debug)]
pub struct Site {
    config: Config,
    converter: Box<dyn MarkdownConverter>,
    generator: Box<dyn OutputGenerator>,
}

impl Site {
    /// A site using the bundled Markdown processor and HTML generator.
    pub fn new(config: Config) -> Self {
        let generator = HtmlGenerator::new().with_minification(config.build.minify);
        Self {
            config,
            converter: Box::new(MarkdownProcessor::for_site()),
            generator: Box::new(generator),
        }
    }

    /// Replaces the Markdown converter.
    pub fn with_converter(mut self, converter: Box<dyn MarkdownConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Replaces the output generator.
    pub fn with_generator(mut self, generator: Box<dyn OutputGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// The project configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a full build with templates loaded from the template directory.
    pub fn generate(&self) -> Result<BuildReport> {
        self.config.validate_layout()?;
        let renderer = HandlebarsRenderer::new(
            &self.config.template_path(),
            &self.config.build.template_extension,
        )?
        .with_strict_mode(self.config.build.strict_templates);
        self.build(&renderer)
    }

    /// Runs a full build with the given renderer.
    pub fn generate_with(&self, renderer: &dyn TemplateRenderer) -> Result<BuildReport> {
        self.config.validate_layout()?;
        self.build(renderer)
    }

    fn build(&self, renderer: &dyn TemplateRenderer) -> Result<BuildReport> {
        let started = Instant::now();
        info!("Building site from {}", self.config.project_dir.display());

        let mut report = BuildReport::default();
        let pages = self.load_pages(&mut report)?;
        let classified = classify(&pages);
        debug!(
            "Classified {} pages: {} singles, {} groups",
            classified.len(),
            classified.singles.len(),
            classified.groups.len()
        );

        let rendered = self.render(&classified, renderer, &mut report)?;
        self.write_site(&rendered, &mut report)?;

        report.duration = started.elapsed();
        info!("{}", report.summary());
        Ok(report)
    }

    /// Every content file below the content directory, sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let root = self.config.content_path();
        let mut files = Vec::new();

        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                HydeError::io_error(path, e.into())
            })?;
            if entry.file_type().is_file() && is_content_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Parses every discovered file. Failures are recorded in `report` or
    /// returned, depending on the error policy.
    pub fn load_pages(&self, report: &mut BuildReport) -> Result<Vec<ContentPage>> {
        let root = self.config.content_path();
        let mut pages = Vec::new();

        for path in self.discover()? {
            match ContentPage::from_file(&path, &root, self.converter.as_ref()) {
                Ok(page) => {
                    debug!("Parsed {} as {}", path.display(), page.canonical_url());
                    pages.push(page);
                }
                Err(e) => self.record_failure(report, path.display().to_string(), e)?,
            }
        }
        Ok(pages)
    }

    /// Renders every page of the build into memory.
    pub fn render(
        &self,
        classified: &Classified<'_>,
        renderer: &dyn TemplateRenderer,
        report: &mut BuildReport,
    ) -> Result<Vec<RenderedPage>> {
        let build = &self.config.build;
        let site = &self.config.site;
        let navigation = build_navigation(
            classified,
            build.page_size,
            renderer,
            &self.config.template_file(&build.navbar_template),
            site,
        )?;

        let mut out = Output::default();

        for page in &classified.singles {
            let url = page.url();
            let context = json!({
                "site": site,
                "page": page.view(&url),
                "navigation": navigation,
            });
            let result =
                renderer.render(&page.template_file(&build.template_extension), &context);
            self.collect(&mut out, report, url, result)?;
        }

        let index_template = self.config.template_file(&build.index_template);
        for group in &classified.groups {
            let mut paginator = Paginator::new(&group.name, &group.pages, build.page_size)?;
            while let Some(index) = paginator.next() {
                let member_pages: Vec<_> =
                    index.items().map(|m| m.page.view(&m.url())).collect();
                let context = json!({
                    "site": site,
                    "index": index.view(),
                    "memberPages": member_pages,
                    "paginator": paginator.view(),
                    "navigation": navigation,
                });
                let result = renderer.render(&index_template, &context);
                self.collect(&mut out, report, index.url(), result)?;

                for member in index.items() {
                    let url = member.url();
                    let context = json!({
                        "site": site,
                        "page": member.page.view(&url),
                        "navigation": navigation,
                    });
                    let template = member.page.template_file(&build.template_extension);
                    let result = renderer.render(&template, &context);
                    self.collect(&mut out, report, url, result)?;
                }
            }
        }

        Ok(out.pages)
    }

    /// Adds a render result to `out`, applying the error policy to failures,
    /// to URLs that were already produced and to URLs below the static
    /// assets directory.
    fn collect(
        &self,
        out: &mut Output,
        report: &mut BuildReport,
        url: PageUrl,
        result: Result<String>,
    ) -> Result<()> {
        match result {
            Ok(_) if is_static_url(&url) => {
                let err = HydeError::ReservedOutput {
                    url: url.to_string(),
                };
                self.record_failure(report, url.to_string(), err)
            }
            Ok(_) if out.seen.contains(&url) => {
                let err = HydeError::DuplicateOutput {
                    url: url.to_string(),
                };
                self.record_failure(report, url.to_string(), err)
            }
            Ok(html) => {
                let _ = out.seen.insert(url.clone());
                out.pages.push(RenderedPage { url, html });
                Ok(())
            }
            Err(e) => self.record_failure(report, url.to_string(), e),
        }
    }

    fn record_failure(
        &self,
        report: &mut BuildReport,
        subject: String,
        error: HydeError,
    ) -> Result<()> {
        if self.config.build.on_error == ErrorPolicy::Abort || !error.is_recoverable() {
            return Err(error);
        }
        warn!("Skipping {subject}: {error}");
        report.failures.push(BuildFailure {
            subject,
            reason: error.to_string(),
        });
        Ok(())
    }

    /// Writes `pages` and static assets into a staging directory, then
    /// replaces the output directory with it.
    fn write_site(&self, pages: &[RenderedPage], report: &mut BuildReport) -> Result<()> {
        let output = self.config.output_path();
        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        fs::create_dir_all(&parent).map_err(|e| HydeError::io_error(parent.clone(), e))?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&parent)
            .map_err(|e| HydeError::io_error(parent.clone(), e))?;
        let staged_site = staging.path().join("site");
        fs::create_dir_all(&staged_site)
            .map_err(|e| HydeError::io_error(staged_site.clone(), e))?;

        for page in pages {
            let path = page.url.output_path(&staged_site);
            self.generator.generate(&page.html, &path)?;
            report.pages_written += 1;
        }

        report.static_files = copy_tree(
            &self.config.static_path(),
            &staged_site.join(STATIC_OUTPUT_DIR),
        )?;

        if output.exists() {
            fs::remove_dir_all(&output).map_err(|e| HydeError::io_error(output.clone(), e))?;
        }
        fs::rename(&staged_site, &output).map_err(|e| {
            HydeError::output_error(
                "Failed to move the staged site into place",
                output.clone(),
                Some(Box::new(e)),
            )
        })?;
        debug!("Swapped staged site into {}", output.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Output {
    pages: Vec<RenderedPage>,
    seen: HashSet<PageUrl>,
}

fn is_static_url(url: &PageUrl) -> bool {
    url.as_str()
        .strip_prefix('/')
        .and_then(|rest| rest.strip_prefix(STATIC_OUTPUT_DIR))
        .is_some_and(|rest| rest.starts_with('/'))
}

fn is_content_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    let markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| CONTENT_EXTENSIONS.contains(&e));
    markdown && !hidden
}
