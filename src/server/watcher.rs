// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filesystem watcher feeding the rebuild queue.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, info};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::core::error::{HydeError, Result};
use crate::server::rebuild::RebuildQueue;
use crate::site::STAGING_PREFIX;

/// Decides which change events trigger a rebuild.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    output_dir: PathBuf,
}

impl WatchFilter {
    /// Ignores everything below `output_dir`, which should be given in the
    /// same form the watcher reports paths in (usually canonical).
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Whether a change to `path` can affect the generated site.
    pub fn is_relevant_path(&self, path: &Path) -> bool {
        if path.starts_with(&self.output_dir) {
            return false;
        }
        let staging = path.components().any(|c| match c {
            Component::Normal(name) => name.to_string_lossy().starts_with(STAGING_PREFIX),
            _ => false,
        });
        if staging {
            return false;
        }
        match path.file_name().map(|n| n.to_string_lossy()) {
            Some(name) => !name.starts_with('.') && !name.ends_with('~'),
            None => false,
        }
    }

    /// Whether `event` should trigger a rebuild: a create, modify or remove
    /// touching at least one relevant path.
    pub fn should_trigger(&self, event: &Event) -> bool {
        let kind = matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        );
        kind && event.paths.iter().any(|p| self.is_relevant_path(p))
    }
}

/// Watches `project_dir` recursively and requests a rebuild for every
/// relevant event. Watching stops when the returned watcher is dropped.
pub fn watch(
    project_dir: &Path,
    filter: WatchFilter,
    queue: Arc<RebuildQueue>,
) -> Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if filter.should_trigger(&event) => {
            debug!("Change detected: {:?} {:?}", event.kind, event.paths);
            if queue.request() {
                info!("Filesystem changed, re-generating");
            }
        }
        Ok(_) => {}
        Err(e) => error!("Watch error: {e}"),
    })
    .map_err(|e| HydeError::Server(format!("Failed to create file watcher: {e}")))?;

    watcher
        .watch(project_dir, RecursiveMode::Recursive)
        .map_err(|e| {
            HydeError::Server(format!("Failed to watch {}: {e}", project_dir.display()))
        })?;
    info!("Started filesystem watcher on '{}'", project_dir.display());
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    fn filter() -> WatchFilter {
        WatchFilter::new("/site/output")
    }

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_relevant_paths() {
        let filter = filter();
        assert!(filter.is_relevant_path(Path::new("/site/content/posts/a.md")));
        assert!(filter.is_relevant_path(Path::new("/site/templates/post.html.hbs")));
        assert!(filter.is_relevant_path(Path::new("/site/hyde.toml")));
    }

    #[test]
    fn test_ignored_paths() {
        let filter = filter();
        assert!(!filter.is_relevant_path(Path::new("/site/output/index.html")));
        assert!(!filter.is_relevant_path(Path::new("/site/output")));
        assert!(!filter.is_relevant_path(Path::new("/site/.hyde-stagingX1y/site/a.html")));
        assert!(!filter.is_relevant_path(Path::new("/site/content/.a.md.swp")));
        assert!(!filter.is_relevant_path(Path::new("/site/content/a.md~")));
        // Sibling directory sharing the output prefix is still watched.
        assert!(filter.is_relevant_path(Path::new("/site/output-notes/a.md")));
    }

    #[test]
    fn test_event_kinds() {
        let filter = filter();
        let path = "/site/content/a.md";
        assert!(filter.should_trigger(&event(EventKind::Create(CreateKind::File), path)));
        assert!(filter.should_trigger(&event(EventKind::Modify(ModifyKind::Any), path)));
        assert!(filter.should_trigger(&event(EventKind::Remove(RemoveKind::File), path)));
        assert!(!filter.should_trigger(&event(EventKind::Access(AccessKind::Any), path)));
        assert!(!filter.should_trigger(&event(EventKind::Any, path)));
    }

    #[test]
    fn test_output_events_never_trigger() {
        let filter = filter();
        let event = event(EventKind::Create(CreateKind::File), "/site/output/posts/index.html");
        assert!(!filter.should_trigger(&event));
    }
}
