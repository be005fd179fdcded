// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end builds against real templates on disk.

use std::fs;
use std::path::Path;

use hyde::{Config, ConfigBuilder, ErrorPolicy, HydeError, Site};
use tempfile::TempDir;

const POST: &str = "<article data-url=\"{{page.url}}\"><h1>{{page.title}}</h1>{{{page.content}}}</article>{{{navigation}}}";
const INDEX: &str = "<section data-url=\"{{index.url}}\">{{#each memberPages}}<a href=\"{{url}}\">{{title}}</a>{{/each}}\
{{#if paginator.hasPrevious}}<link rel=\"prev\" href=\"{{paginator.previousUrl}}\">{{/if}}\
{{#if paginator.hasNext}}<link rel=\"next\" href=\"{{paginator.nextUrl}}\">{{/if}}</section>";
const NAVBAR: &str = "<nav>{{#each entries}}<a href=\"{{url}}\">{{title}}</a>{{/each}}</nav>";

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "templates/post.html.hbs", POST);
    write(dir.path(), "templates/index.html.hbs", INDEX);
    write(dir.path(), "templates/navbar.html.hbs", NAVBAR);
    fs::create_dir_all(dir.path().join("content")).unwrap();
    dir
}

fn page(title: &str, stub: &str) -> String {
    format!("title: {title}\nurlstub: {stub}\n---\nText of {stub}.\n")
}

fn config(dir: &TempDir, page_size: usize) -> Config {
    ConfigBuilder::new(dir.path())
        .with_override("build.page_size", page_size)
        .build()
        .unwrap()
}

fn read(dir: &TempDir, relative: &str) -> String {
    fs::read_to_string(dir.path().join("output").join(relative)).unwrap()
}

#[test]
fn three_posts_with_page_size_two() {
    let dir = project();
    write(dir.path(), "content/posts/a.md", &page("Test", "test-title-stub"));
    write(dir.path(), "content/posts/b.md", &page("Second", "test-post-2"));
    write(dir.path(), "content/posts/c.md", &page("Third", "test-post-3"));

    let report = Site::new(config(&dir, 2)).generate().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.pages_written, 5);

    let first = read(&dir, "posts/index.html");
    assert!(first.contains(r#"<a href="/posts/test-title-stub.html">Test</a>"#));
    assert!(first.contains(r#"<a href="/posts/test-post-2.html">Second</a>"#));
    assert!(first.contains(r#"<link rel="next" href="/posts/index2.html">"#));
    assert!(!first.contains(r#"rel="prev""#));

    let second = read(&dir, "posts/index2.html");
    assert!(second.contains(r#"<a href="/posts/test-post-3.html">Third</a>"#));
    assert!(second.contains(r#"<link rel="prev" href="/posts/index.html">"#));
    assert!(!second.contains(r#"rel="next""#));

    let member = read(&dir, "posts/test-post-3.html");
    assert!(member.contains(r#"data-url="/posts/test-post-3.html""#));
    assert!(member.contains("<p>Text of test-post-3.</p>"));
    assert!(member.contains(r#"<nav><a href="/posts/index.html">posts</a></nav>"#));
}

#[test]
fn singles_and_groups_round_trip() {
    let dir = project();
    write(dir.path(), "content/about.md", &page("About", "about"));
    write(dir.path(), "content/contact.md", &page("Contact", "contact"));
    for i in 0..7 {
        write(
            dir.path(),
            &format!("content/notes/n{i}.md"),
            &page(&format!("Note {i}"), &format!("n{i}")),
        );
    }

    let report = Site::new(config(&dir, 3)).generate().unwrap();

    // 2 singles + 3 index pages + 7 members.
    assert_eq!(report.pages_written, 12);
    assert!(dir.path().join("output/about.html").is_file());
    assert!(dir.path().join("output/notes/index3.html").is_file());
    assert!(!dir.path().join("output/notes/index4.html").exists());
    assert!(!dir.path().join("output/notes/notes").exists());

    let about = read(&dir, "about.html");
    assert!(about.contains(
        r#"<nav><a href="/about.html">About</a><a href="/contact.html">Contact</a><a href="/notes/index.html">notes</a></nav>"#
    ));
}

#[test]
fn repeated_builds_are_identical() {
    let dir = project();
    write(dir.path(), "content/posts/a.md", &page("A", "a"));
    write(dir.path(), "content/posts/b.md", &page("B", "b"));
    let site = Site::new(config(&dir, 1));

    let _ = site.generate().unwrap();
    let first = read(&dir, "posts/index2.html");
    let _ = site.generate().unwrap();
    let second = read(&dir, "posts/index2.html");

    assert_eq!(first, second);
    assert!(second.contains(r#"href="/posts/b.html""#));
}

#[test]
fn missing_title_is_skipped_and_siblings_render() {
    let dir = project();
    write(dir.path(), "content/posts/bad.md", "urlstub: bad\n---\nNo title.\n");
    write(dir.path(), "content/posts/good.md", &page("Good", "good"));

    let report = Site::new(config(&dir, 10)).generate().unwrap();

    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].subject.ends_with("bad.md"));
    assert!(dir.path().join("output/posts/good.html").is_file());
    assert!(!dir.path().join("output/posts/bad.html").exists());
    assert!(!read(&dir, "posts/index.html").contains("bad"));
}

#[test]
fn strict_build_keeps_previous_output() {
    let dir = project();
    write(dir.path(), "content/a.md", &page("A", "a"));
    let _ = Site::new(config(&dir, 10)).generate().unwrap();
    let before = read(&dir, "a.html");

    write(dir.path(), "content/b.md", "title: [oops\n");
    let mut strict = config(&dir, 10);
    strict.build.on_error = ErrorPolicy::Abort;
    let err = Site::new(strict).generate().unwrap_err();

    assert!(matches!(err, HydeError::Metadata { .. }));
    assert_eq!(read(&dir, "a.html"), before);
}

#[test]
fn configured_output_dir_and_templates() {
    let dir = project();
    write(dir.path(), "templates/list.html.hbs", "LIST {{index.name}}");
    write(dir.path(), "content/posts/a.md", &page("A", "a"));
    write(
        dir.path(),
        "hyde.toml",
        "output_dir = \"public\"\n[build]\nindex_template = \"list\"\n",
    );

    let config = ConfigBuilder::new(dir.path()).build().unwrap();
    let _ = Site::new(config).generate().unwrap();

    let index = fs::read_to_string(dir.path().join("public/posts/index.html")).unwrap();
    assert_eq!(index, "LIST posts");
    assert!(!dir.path().join("output").exists());
}

#[test]
fn broken_template_stops_the_build() {
    let dir = project();
    write(dir.path(), "templates/broken.html.hbs", "{{#each}}");
    write(dir.path(), "content/a.md", &page("A", "a"));

    let err = Site::new(config(&dir, 10)).generate().unwrap_err();
    assert!(matches!(err, HydeError::Template { .. }));
    assert!(!dir.path().join("output").exists());
}
