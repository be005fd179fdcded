// Copyright © 2024 Hyde. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-slot rebuild queue.
//!
//! Watch events call [`RebuildQueue::request`]; one worker thread drains the
//! queue. Any number of requests made while a rebuild is pending collapse
//! into that one rebuild, so at most one rebuild runs and at most one waits.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, trace};
use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct QueueState {
    pending: bool,
    shutdown: bool,
}

/// Coalescing rebuild request flag.
#[derive(Debug, Default)]
pub struct RebuildQueue {
    state: Mutex<QueueState>,
    signal: Condvar,
}

impl RebuildQueue {
    /// An empty, running queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks for a rebuild. Returns `false` when the request was merged into
    /// one already pending, or the queue is shut down.
    pub fn request(&self) -> bool {
        let mut state = self.state.lock();
        if state.shutdown || state.pending {
            return false;
        }
        state.pending = true;
        let _ = self.signal.notify_one();
        true
    }

    /// Stops the queue. Pending requests are dropped and waiters woken.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        state.shutdown = true;
        state.pending = false;
        let _ = self.signal.notify_all();
    }

    /// Blocks until a rebuild is pending or the queue shuts down. Returns
    /// `false` on shutdown.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        while !state.pending && !state.shutdown {
            self.signal.wait(&mut state);
        }
        !state.shutdown
    }

    /// Claims the pending request. Returns `false` if there is none or the
    /// queue shut down meanwhile.
    pub fn take(&self) -> bool {
        let mut state = self.state.lock();
        if state.shutdown || !state.pending {
            return false;
        }
        state.pending = false;
        true
    }
}

/// Starts the worker thread. After each request it sleeps for `debounce`,
/// so a burst of events ends in a single rebuild, then runs `rebuild`.
/// The thread exits once the queue shuts down and returns how many
/// rebuilds it ran.
pub fn spawn_worker<F>(
    queue: Arc<RebuildQueue>,
    debounce: Duration,
    mut rebuild: F,
) -> io::Result<JoinHandle<usize>>
where
    F: FnMut() + Send + 'static,
{
    thread::Builder::new()
        .name("hyde-rebuild".to_string())
        .spawn(move || {
            let mut builds = 0;
            while queue.wait() {
                if !debounce.is_zero() {
                    thread::sleep(debounce);
                }
                if !queue.take() {
                    continue;
                }
                trace!("Running queued rebuild");
                rebuild();
                builds += 1;
            }
            debug!("Rebuild worker stopped after {builds} rebuilds");
            builds
        })
}
