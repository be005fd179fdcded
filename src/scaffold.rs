// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Project Scaffolding
//!
//! `hyde new <dir>` writes a small working project: configuration,
//! templates for every page kind, a home page, an about page and one post.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::core::config::CONFIG_FILE_NAME;
use crate::core::error::{HydeError, Result};
use crate::files::write_content;

const CONFIG: &str = r#"content_dir = "content"
template_dir = "templates"
static_dir = "static"
output_dir = "output"

[site]
name = "My Hyde Site"
base_url = "/"

[build]
page_size = 10
on_error = "skip"

[server]
address = "127.0.0.1"
port = 8000
"#;

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{page.title}} | {{site.name}}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
"#;

const POST_TEMPLATE: &str = r#"<body>
  {{{navigation}}}
  <main>
    <article>
      <h1>{{page.title}}</h1>
      {{#if page.meta.date}}<p class="date">{{format_date page.meta.date "%B %e, %Y"}}{{#if page.meta.author}} by {{page.meta.author}}{{/if}}</p>{{/if}}
      {{{page.content}}}
    </article>
  </main>
</body>
</html>
"#;

const HOME_TEMPLATE: &str = r#"<body>
  {{{navigation}}}
  <main class="home">
    {{{page.content}}}
  </main>
</body>
</html>
"#;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{index.name}} | {{site.name}}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  {{{navigation}}}
  <main>
    <h1>{{index.name}}</h1>
    <ul>
      {{#each memberPages}}
      <li><a href="{{url}}">{{title}}</a>{{#if meta.date}} <span class="date">{{meta.date}}</span>{{/if}}</li>
      {{/each}}
    </ul>
    <nav class="pager">
      {{#if paginator.hasPrevious}}<a href="{{paginator.previousUrl}}">&larr; Newer</a>{{/if}}
      {{#if paginator.hasNext}}<a href="{{paginator.nextUrl}}">Older &rarr;</a>{{/if}}
    </nav>
  </main>
</body>
</html>
"#;

const NAVBAR_TEMPLATE: &str = r#"<nav class="site-nav">
  <a class="brand" href="{{site.baseUrl}}">{{site.name}}</a>
  <ul>
    {{#each entries}}
    <li><a href="{{url}}">{{title}}</a></li>
    {{/each}}
  </ul>
</nav>
"#;

const HOME_PAGE: &str = "title: Home
urlstub: index
template: home
---
# Welcome to Hyde

This site was generated by `hyde new`. Edit the files in `content/` and run
`hyde gen` to rebuild it.
";

const ABOUT_PAGE: &str = "title: About
urlstub: about
---
# About

Pages directly inside `content/` are linked from the navigation bar.
";

const FIRST_POST: &str = "title: Hello, world
urlstub: hello-world
date: 2024-01-01
author: Hyde
---
Files inside a directory of `content/` form a group. Each group gets
paginated index pages under `/<group>/`.
";

const STYLESHEET: &str = "body { font-family: sans-serif; max-width: 42rem; margin: 0 auto; }
.site-nav ul { list-style: none; padding: 0; display: flex; gap: 1rem; }
.date { color: #666; }
";

/// Creates a new project at `dir` and returns the files written.
///
/// # Errors
///
/// Fails if `dir` already exists or a file cannot be written.
pub fn create_project(dir: &Path) -> Result<Vec<PathBuf>> {
    if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| HydeError::io_error(parent.to_path_buf(), e))?;
    }
    fs::create_dir(dir).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            HydeError::config_error(
                format!("There's already a directory at {}", dir.display()),
                Some(dir.to_path_buf()),
            )
        } else {
            HydeError::io_error(dir.to_path_buf(), e)
        }
    })?;
    info!("Creating a new Hyde project at {}", dir.display());

    let post = format!("{HEAD}{POST_TEMPLATE}");
    let home = format!("{HEAD}{HOME_TEMPLATE}");
    let files: [(&str, &str); 9] = [
        (CONFIG_FILE_NAME, CONFIG),
        ("templates/post.html.hbs", &post),
        ("templates/home.html.hbs", &home),
        ("templates/index.html.hbs", INDEX_TEMPLATE),
        ("templates/navbar.html.hbs", NAVBAR_TEMPLATE),
        ("content/index.md", HOME_PAGE),
        ("content/about.md", ABOUT_PAGE),
        ("content/posts/hello-world.md", FIRST_POST),
        ("static/style.css", STYLESHEET),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (relative, body) in files {
        let path = dir.join(relative);
        write_content(&path, body)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigBuilder;
    use crate::site::Site;
    use tempfile::TempDir;

    #[test]
    fn test_creates_layout() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("blog");

        let written = create_project(&project).unwrap();

        assert_eq!(written.len(), 9);
        assert!(project.join("hyde.toml").is_file());
        assert!(project.join("templates/navbar.html.hbs").is_file());
        assert!(project.join("content/posts/hello-world.md").is_file());
        assert!(project.join("static/style.css").is_file());
    }

    #[test]
    fn test_refuses_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = create_project(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("already a directory"));
    }

    #[test]
    fn test_scaffold_builds_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("site");
        let _ = create_project(&project).unwrap();

        let config = ConfigBuilder::new(&project).build().unwrap();
        let report = Site::new(config).generate().unwrap();

        assert!(report.is_clean(), "{report}");
        assert_eq!(report.pages_written, 4);
        assert_eq!(report.static_files, 1);

        let out = project.join("output");
        let home = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(home.contains("<h1>Welcome to Hyde</h1>"));
        assert!(home.contains(r#"<a href="/posts/index.html">posts</a>"#));

        let post = fs::read_to_string(out.join("posts/hello-world.html")).unwrap();
        assert!(post.contains("January  1, 2024 by Hyde"));

        let index = fs::read_to_string(out.join("posts/index.html")).unwrap();
        assert!(index.contains(r#"<a href="/posts/hello-world.html">Hello, world</a>"#));
        assert!(!index.contains("Older"));
    }
}
