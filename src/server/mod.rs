// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Development Server
//!
//! `hyde serve` builds the site once, then serves the output directory over
//! HTTP while a filesystem watcher feeds a [`RebuildQueue`]. A single worker
//! thread runs the rebuilds.
//!
//! Ctrl-C shuts down in order: the queue stops taking requests, the worker
//! finishes any rebuild in flight and is joined, the HTTP listener stops,
//! and finally the watcher is dropped.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use log::{error, info, warn};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::core::error::{HydeError, Result};
use crate::site::Site;

/// Coalescing rebuild queue and its worker thread.
pub mod rebuild;
/// Filesystem watcher and event filtering.
pub mod watcher;

pub use rebuild::{spawn_worker, RebuildQueue};
pub use watcher::{watch, WatchFilter};

/// Router serving `output_dir` as static files, with `index.html` for
/// directory requests.
pub fn router(output_dir: &Path) -> Router {
    let files = ServeDir::new(output_dir).append_index_html_on_directories(true);
    Router::new().fallback_service(files)
}

/// Builds `site`, then serves it on `address:port` until Ctrl-C, rebuilding
/// whenever project files change.
pub async fn serve(site: Site, address: &str, port: u16) -> Result<()> {
    match site.generate() {
        Ok(report) if !report.is_clean() => warn!("Initial build skipped some files:\n{report}"),
        Ok(_) => {}
        Err(e @ HydeError::Validation { .. }) => return Err(e),
        Err(e) => error!("Initial build failed: {e}"),
    }

    let config = site.config();
    let root = fs::canonicalize(&config.project_dir)
        .map_err(|e| HydeError::io_error(config.project_dir.clone(), e))?;
    let output = config.output_path();
    let output = fs::canonicalize(&output).unwrap_or_else(|_| root.join(&config.output_dir));
    let debounce = Duration::from_millis(config.server.debounce_ms);

    let queue = Arc::new(RebuildQueue::new());
    let site = Arc::new(site);
    let worker = spawn_worker(Arc::clone(&queue), debounce, move || match site.generate() {
        Ok(report) => info!("Rebuilt site: {}", report.summary()),
        Err(e) => error!("Rebuild failed: {e}"),
    })
    .map_err(|e| HydeError::Server(format!("Failed to start rebuild worker: {e}")))?;

    let watcher = watch(&root, WatchFilter::new(output.clone()), Arc::clone(&queue))?;

    let listener = TcpListener::bind((address, port))
        .await
        .map_err(|e| HydeError::Server(format!("Failed to bind {address}:{port}: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| HydeError::Server(e.to_string()))?;
    info!("Serving Hyde site at http://{local}");
    info!("Press Ctrl-C to stop...");

    let shutdown_queue = Arc::clone(&queue);
    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
        }
        info!("Shutting down");
        shutdown_queue.shutdown();
        match tokio::task::spawn_blocking(move || worker.join()).await {
            Ok(Ok(builds)) => info!("Rebuild worker stopped after {builds} rebuilds"),
            Ok(Err(_)) => error!("Rebuild worker panicked"),
            Err(e) => error!("Failed to join rebuild worker: {e}"),
        }
    };

    axum::serve(listener, router(&output))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| HydeError::Server(format!("HTTP server error: {e}")))?;

    drop(watcher);
    info!("Stopped filesystem watcher");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request =
            format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        let _ = stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_router_serves_output() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        fs::write(dir.path().join("posts/index.html"), "<h1>posts</h1>").unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(dir.path());
        let _server = tokio::spawn(async move { axum::serve(listener, app).await });

        let response = get(addr, "/").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("<h1>home</h1>"));

        let response = get(addr, "/posts/").await;
        assert!(response.ends_with("<h1>posts</h1>"));

        let response = get(addr, "/missing.html").await;
        assert!(response.starts_with("HTTP/1.1 404"));
    }
}
