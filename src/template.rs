// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Template Rendering Module
//!
//! Handlebars-backed implementation of
//! [`TemplateRenderer`](crate::core::traits::TemplateRenderer).
//!
//! Every file in the template directory whose name ends in
//! `.<extension>` is registered under its path relative to that directory,
//! so `templates/post.html.hbs` is rendered as `post.html.hbs` and
//! `templates/parts/footer.html.hbs` as `parts/footer.html.hbs`.
//!
//! ## Helpers
//!
//! - `format_date`: `{{format_date page.meta.date "%B %e, %Y"}}` reformats an
//!   ISO `YYYY-MM-DD` date with a chrono format string. Unparseable input is
//!   echoed unchanged.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use handlebars::{handlebars_helper, Handlebars};
use log::debug;
use serde_json::Value as JsonValue;
use walkdir::WalkDir;

use crate::core::error::{HydeError, Result};
use crate::core::traits::TemplateRenderer;
use crate::files::read_content;

handlebars_helper!(format_date: |date: str, pattern: str| {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => {
            let mut out = String::new();
            if write!(out, "{}", parsed.format(pattern)).is_err() {
                out = date.to_string();
            }
            out
        }
        Err(_) => date.to_string(),
    }
});

/// Renderer for Handlebars templates loaded from a directory.
pub struct HandlebarsRenderer {
    engine: Handlebars<'static>,
    template_dir: PathBuf,
    names: BTreeSet<String>,
}

impl std::fmt::Debug for HandlebarsRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlebarsRenderer")
            .field("template_dir", &self.template_dir)
            .field("templates", &self.names)
            .finish()
    }
}

impl HandlebarsRenderer {
    /// Loads every `*.<extension>` file below `template_dir`.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be walked, a file cannot be read, or a
    /// template does not compile.
    pub fn new(template_dir: &Path, extension: &str) -> Result<Self> {
        let mut engine = Handlebars::new();
        engine.register_escape_fn(handlebars::html_escape);
        engine.register_helper("format_date", Box::new(format_date));

        let mut renderer = Self {
            engine,
            template_dir: template_dir.to_path_buf(),
            names: BTreeSet::new(),
        };
        renderer.load_templates(extension)?;
        Ok(renderer)
    }

    /// Enables strict mode: referencing a missing field fails the render.
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.engine.set_strict_mode(strict);
        self
    }

    /// Registers a template from a string, replacing any with the same name.
    pub fn register(&mut self, name: &str, source: &str) -> Result<()> {
        self.engine
            .register_template_string(name, source)
            .map_err(|e| {
                HydeError::template_error(
                    format!("Failed to register template: {e}"),
                    name,
                    Some(Box::new(e)),
                )
            })?;
        let _ = self.names.insert(name.to_string());
        Ok(())
    }

    /// Names of every registered template, sorted.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    fn load_templates(&mut self, extension: &str) -> Result<()> {
        let suffix = format!(".{extension}");
        let root = self.template_dir.clone();

        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                HydeError::template_error(
                    format!("Failed to read template directory: {e}"),
                    &root.display().to_string(),
                    Some(Box::new(e)),
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if !name.ends_with(&suffix) {
                continue;
            }

            let source = read_content(entry.path())?;
            self.register(&name, &source)?;
            debug!("Registered template {name}");
        }
        Ok(())
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &str, context: &JsonValue) -> Result<String> {
        if !self.has_template(template) {
            return Err(HydeError::template_error(
                format!("Template '{template}' not found"),
                template,
                None,
            ));
        }

        self.engine.render(template, context).map_err(|e| {
            HydeError::template_error(
                format!("Template rendering failed: {e}"),
                template,
                Some(Box::new(e)),
            )
        })
    }

    fn has_template(&self, template: &str) -> bool {
        self.names.contains(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn template_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, body) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        dir
    }

    #[test]
    fn test_loads_by_full_file_name() {
        let dir = template_dir(&[
            ("post.html.hbs", "<h1>{{page.title}}</h1>"),
            ("notes.txt", "ignored"),
        ]);
        let renderer = HandlebarsRenderer::new(dir.path(), "hbs").unwrap();

        assert!(renderer.has_template("post.html.hbs"));
        assert!(!renderer.has_template("post"));
        assert!(!renderer.has_template("notes.txt"));

        let html = renderer
            .render("post.html.hbs", &json!({"page": {"title": "Hi"}}))
            .unwrap();
        assert_eq!(html, "<h1>Hi</h1>");
    }

    #[test]
    fn test_missing_template_is_template_error() {
        let dir = template_dir(&[]);
        let renderer = HandlebarsRenderer::new(dir.path(), "hbs").unwrap();

        let err = renderer.render("nope.html.hbs", &json!({})).unwrap_err();
        assert!(matches!(err, HydeError::Template { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_escaping_and_triple_stash() {
        let dir = template_dir(&[(
            "page.html.hbs",
            "{{title}}|{{{content}}}",
        )]);
        let renderer = HandlebarsRenderer::new(dir.path(), "hbs").unwrap();

        let html = renderer
            .render(
                "page.html.hbs",
                &json!({"title": "<b>", "content": "<p>x</p>"}),
            )
            .unwrap();
        assert_eq!(html, "&lt;b&gt;|<p>x</p>");
    }

    #[test]
    fn test_subdirectory_names() {
        let dir = template_dir(&[("parts/footer.html.hbs", "<footer/>")]);
        let renderer = HandlebarsRenderer::new(dir.path(), "hbs").unwrap();

        let names: Vec<_> = renderer.template_names().collect();
        assert_eq!(names, ["parts/footer.html.hbs"]);
    }

    #[test]
    fn test_broken_template_fails_to_load() {
        let dir = template_dir(&[("bad.html.hbs", "{{#if}}")]);
        assert!(HandlebarsRenderer::new(dir.path(), "hbs").is_err());
    }

    #[test]
    fn test_format_date_helper() {
        let dir = template_dir(&[(
            "d.html.hbs",
            r#"{{format_date date "%d/%m/%Y"}}"#,
        )]);
        let renderer = HandlebarsRenderer::new(dir.path(), "hbs").unwrap();

        let html = renderer
            .render("d.html.hbs", &json!({"date": "2021-03-01"}))
            .unwrap();
        assert_eq!(html, "01/03/2021");

        let html = renderer
            .render("d.html.hbs", &json!({"date": "soon"}))
            .unwrap();
        assert_eq!(html, "soon");
    }

    #[test]
    fn test_strict_mode_rejects_missing_fields() {
        let dir = template_dir(&[("p.html.hbs", "{{missing}}")]);
        let renderer = HandlebarsRenderer::new(dir.path(), "hbs")
            .unwrap()
            .with_strict_mode(true);
        assert!(renderer.render("p.html.hbs", &json!({})).is_err());
    }
}
