// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Configuration Module
//!
//! Project configuration for Hyde. Settings are layered, each layer
//! overriding the previous one:
//!
//! 1. built-in defaults,
//! 2. an optional `hyde.toml` in the project root,
//! 3. environment variables carrying a prefix (`HYDE_OUTPUT_DIR`,
//!    `HYDE_BUILD__PAGE_SIZE`, ...),
//! 4. programmatic overrides, which is how the CLI applies its flags.
//!
//! Relative directories are resolved against the project root.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hyde::core::config::{ConfigBuilder, ErrorPolicy};
//!
//! let config = ConfigBuilder::new("my-site")
//!     .with_env_prefix("HYDE_")
//!     .with_override("build.on_error", "abort")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.build.on_error, ErrorPolicy::Abort);
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::error::{HydeError, Result};

/// Name of the optional configuration file in the project root.
pub const CONFIG_FILE_NAME: &str = "hyde.toml";

/// Environment variable prefix used by the CLI.
pub const ENV_PREFIX: &str = "HYDE_";

/// What to do when a single content file or page cannot be built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log a warning, leave the file out, keep building.
    #[default]
    Skip,
    /// Stop the build at the first failure.
    Abort,
}

impl FromStr for ErrorPolicy {
    type Err = HydeError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "skip" => Ok(ErrorPolicy::Skip),
            "abort" => Ok(ErrorPolicy::Abort),
            other => Err(HydeError::config_error(
                format!("Unknown error policy '{other}' (expected 'skip' or 'abort')"),
                None,
            )),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::Skip => f.write_str("skip"),
            ErrorPolicy::Abort => f.write_str("abort"),
        }
    }
}

/// Top-level project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the project. Not read from the file.
    #[serde(skip)]
    pub project_dir: PathBuf,

    #[serde(default = "default_content_dir")]
    /// Directory holding Markdown content.
    pub content_dir: PathBuf,

    #[serde(default = "default_template_dir")]
    /// Directory holding template files.
    pub template_dir: PathBuf,

    #[serde(default = "default_static_dir")]
    /// Directory copied verbatim to `<output>/static`.
    pub static_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    /// Directory the site is generated into. Regenerated on every build.
    pub output_dir: PathBuf,

    #[serde(default)]
    /// Site-wide values exposed to every template as `site`.
    pub site: SiteConfig,

    #[serde(default)]
    /// Build settings.
    pub build: BuildConfig,

    #[serde(default)]
    /// Development server settings.
    pub server: ServerConfig,
}

/// Site-wide values exposed to templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    /// Human-readable site name.
    pub name: String,

    #[serde(default = "default_base_url", alias = "base_url")]
    /// Base URL the site is published under.
    pub base_url: String,
}

/// Settings controlling a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_page_size")]
    /// Members per generated index page.
    pub page_size: usize,

    #[serde(default)]
    /// How per-file and per-page failures are handled.
    pub on_error: ErrorPolicy,

    #[serde(default = "default_template_extension")]
    /// Extension of template files, as in `post.html.<ext>`.
    pub template_extension: String,

    #[serde(default = "default_index_template")]
    /// Template used for paginated index pages.
    pub index_template: String,

    #[serde(default = "default_navbar_template")]
    /// Template used for the navigation fragment.
    pub navbar_template: String,

    #[serde(default)]
    /// Minify generated HTML.
    pub minify: bool,

    #[serde(default)]
    /// Fail a page when its template references a missing field.
    pub strict_templates: bool,
}

/// Settings for `hyde serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    /// Address to bind.
    pub address: String,

    #[serde(default = "default_port")]
    /// Port to bind.
    pub port: u16,

    #[serde(default = "default_debounce_ms")]
    /// Quiet period before a triggered rebuild starts, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            content_dir: default_content_dir(),
            template_dir: default_template_dir(),
            static_dir: default_static_dir(),
            output_dir: default_output_dir(),
            site: SiteConfig::default(),
            build: BuildConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            base_url: default_base_url(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            on_error: ErrorPolicy::default(),
            template_extension: default_template_extension(),
            index_template: default_index_template(),
            navbar_template: default_navbar_template(),
            minify: false,
            strict_templates: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Config {
    /// Default configuration rooted at `project_dir`.
    pub fn for_project<P: AsRef<Path>>(project_dir: P) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Absolute or project-relative path of the content directory.
    pub fn content_path(&self) -> PathBuf {
        self.resolve(&self.content_dir)
    }

    /// Path of the template directory.
    pub fn template_path(&self) -> PathBuf {
        self.resolve(&self.template_dir)
    }

    /// Path of the static assets directory.
    pub fn static_path(&self) -> PathBuf {
        self.resolve(&self.static_dir)
    }

    /// Path of the output directory.
    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    /// Template file name for a template stem, e.g. `post` -> `post.html.hbs`.
    pub fn template_file(&self, stem: &str) -> String {
        format!("{stem}.html.{}", self.build.template_extension)
    }

    /// Checks the project layout, collecting every problem before failing.
    pub fn validate_layout(&self) -> Result<()> {
        let mut problems = Vec::new();
        for (path, name) in [
            (self.template_path(), "templates"),
            (self.content_path(), "content"),
        ] {
            if !path.is_dir() {
                problems.push(format!(
                    "project is missing the '{name}' directory ({})",
                    path.display()
                ));
            }
        }
        problems.extend(self.output_overlaps());
        if problems.is_empty() {
            Ok(())
        } else {
            Err(HydeError::validation(problems))
        }
    }

    /// Every build deletes the output directory, so it may neither hold the
    /// project nor share a tree with a source directory.
    fn output_overlaps(&self) -> Vec<String> {
        let output = normalize(&self.output_path());
        let mut problems = Vec::new();

        if normalize(&self.project_dir).starts_with(&output) {
            problems.push(format!(
                "output directory ({}) would replace the project directory",
                output.display()
            ));
        }
        for (path, name) in [
            (self.content_path(), "content"),
            (self.template_path(), "templates"),
            (self.static_path(), "static"),
        ] {
            let source = normalize(&path);
            if source.starts_with(&output) || output.starts_with(&source) {
                problems.push(format!(
                    "output directory ({}) overlaps the '{name}' directory ({})",
                    output.display(),
                    source.display()
                ));
            }
        }
        problems
    }

    fn resolve(&self, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.project_dir.join(dir)
        }
    }
}

/// Builds a [`Config`] from its layers.
#[derive(Debug)]
pub struct ConfigBuilder {
    project_dir: PathBuf,
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    overrides: Vec<(String, String)>,
}

impl ConfigBuilder {
    /// Starts a builder for the project rooted at `project_dir`. The file
    /// `hyde.toml` in that directory is read if it exists.
    pub fn new<P: AsRef<Path>>(project_dir: P) -> Self {
        Self {
            project_dir: project_dir.as_ref().to_path_buf(),
            config_file: None,
            env_prefix: None,
            overrides: Vec::new(),
        }
    }

    /// Reads configuration from an explicit file instead of `hyde.toml`.
    /// The file must exist.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Applies environment variables starting with `prefix`.
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Overrides a single key (`output_dir`, `build.page_size`, ...).
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.overrides.push((key.into(), value.to_string()));
        self
    }

    /// Loads and merges every layer, then validates the values.
    pub fn build(self) -> Result<Config> {
        let mut config = match &self.config_file {
            Some(path) => load_from_file(path)?,
            None => {
                let default_file = self.project_dir.join(CONFIG_FILE_NAME);
                if default_file.is_file() {
                    load_from_file(&default_file)?
                } else {
                    Config::default()
                }
            }
        };
        config.project_dir = self.project_dir;

        if let Some(prefix) = &self.env_prefix {
            apply_env_overrides(&mut config, prefix)?;
        }

        for (key, value) in &self.overrides {
            apply_config_value(&mut config, key, value)?;
        }

        validate_config(&config)?;
        Ok(config)
    }
}

fn load_from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        HydeError::config_error(
            format!("Failed to read config file: {e}"),
            Some(path.to_path_buf()),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        HydeError::config_error(
            format!("Failed to parse config file: {e}"),
            Some(path.to_path_buf()),
        )
    })
}

fn apply_env_overrides(config: &mut Config, prefix: &str) -> Result<()> {
    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(prefix) {
            let config_key = stripped
                .trim_start_matches('_')
                .to_lowercase()
                .replace("__", ".");
            if is_known_key(&config_key) {
                apply_config_value(config, &config_key, &value)?;
            } else {
                debug!("Ignoring unrelated environment variable {key}");
            }
        }
    }
    Ok(())
}

const KNOWN_KEYS: &[&str] = &[
    "content_dir",
    "template_dir",
    "static_dir",
    "output_dir",
    "site.name",
    "site.base_url",
    "build.page_size",
    "build.on_error",
    "build.template_extension",
    "build.index_template",
    "build.navbar_template",
    "build.minify",
    "build.strict_templates",
    "server.address",
    "server.port",
    "server.debounce_ms",
];

fn is_known_key(key: &str) -> bool {
    KNOWN_KEYS.contains(&key)
}

fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "content_dir" => config.content_dir = PathBuf::from(value),
        "template_dir" => config.template_dir = PathBuf::from(value),
        "static_dir" => config.static_dir = PathBuf::from(value),
        "output_dir" => config.output_dir = PathBuf::from(value),
        "site.name" => config.site.name = value.to_string(),
        "site.base_url" => config.site.base_url = value.to_string(),
        "build.page_size" => config.build.page_size = parse_value(key, value)?,
        "build.on_error" => config.build.on_error = value.parse()?,
        "build.template_extension" => {
            config.build.template_extension = value.trim_start_matches('.').to_string()
        }
        "build.index_template" => config.build.index_template = value.to_string(),
        "build.navbar_template" => config.build.navbar_template = value.to_string(),
        "build.minify" => config.build.minify = parse_value(key, value)?,
        "build.strict_templates" => {
            config.build.strict_templates = parse_value(key, value)?
        }
        "server.address" => config.server.address = value.to_string(),
        "server.port" => config.server.port = parse_value(key, value)?,
        "server.debounce_ms" => config.server.debounce_ms = parse_value(key, value)?,
        _ => {
            return Err(HydeError::config_error(
                format!("Unknown configuration key: {key}"),
                None,
            ));
        }
    }
    Ok(())
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e| {
        HydeError::config_error(format!("Invalid {key} value '{value}': {e}"), None)
    })
}

fn validate_config(config: &Config) -> Result<()> {
    if config.build.page_size == 0 {
        return Err(HydeError::config_error(
            "build.page_size must be at least 1",
            None,
        ));
    }
    if config.build.template_extension.is_empty() {
        return Err(HydeError::config_error(
            "build.template_extension cannot be empty",
            None,
        ));
    }
    for (name, value) in [
        ("build.index_template", &config.build.index_template),
        ("build.navbar_template", &config.build.navbar_template),
    ] {
        if value.trim().is_empty() {
            return Err(HydeError::config_error(
                format!("{name} cannot be empty"),
                None,
            ));
        }
    }
    Ok(())
}

/// Absolute form of `path` with `.` and `..` resolved and symlinks followed
/// as far as the path exists.
fn normalize(dir: &Path) -> PathBuf {
    let absolute = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let _ = lexical.pop();
            }
            other => lexical.push(other),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => break,
        }
    }
    let mut resolved = fs::canonicalize(existing).unwrap_or_else(|_| existing.to_path_buf());
    resolved.extend(missing.into_iter().rev());
    resolved
}

// Default value functions
fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_site_name() -> String {
    "Hyde Site".to_string()
}

fn default_base_url() -> String {
    "/".to_string()
}

fn default_page_size() -> usize {
    crate::paginator::DEFAULT_PAGE_SIZE
}

fn default_template_extension() -> String {
    "hbs".to_string()
}

fn default_index_template() -> String {
    "index".to_string()
}

fn default_navbar_template() -> String {
    "navbar".to_string()
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_debounce_ms() -> u64 {
    200
}
