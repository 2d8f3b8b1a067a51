//! Engine controller implementation.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::board::position::BitPosition;
use crate::board::search::{SearchLimits, SearchLogger, SearchReport, ThreadPool};

/// A search running on a background thread, driving
/// `ThreadPool::start_thinking` to completion.
pub struct SearchJob {
    pool: Arc<ThreadPool>,
    handle: JoinHandle<()>,
}

impl SearchJob {
    /// Request the search stop and block until the thread finishes.
    pub fn stop_and_wait(self) {
        self.pool.request_stop();
        let _ = self.handle.join();
    }

    /// Request the search stop without waiting for it to finish.
    pub fn signal_stop(&self) {
        self.pool.request_stop();
    }
}

/// Engine controller managing the position, the shared Lazy-SMP thread
/// pool, and whichever background search job is currently running.
pub struct EngineController {
    position: BitPosition,
    pool: Arc<ThreadPool>,
    current_job: Option<SearchJob>,
    threads: usize,
}

impl EngineController {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        EngineController { position: BitPosition::new(), pool: Arc::new(ThreadPool::new(1, tt_mb)), current_job: None, threads: 1 }
    }

    #[must_use]
    pub fn position(&self) -> &BitPosition {
        &self.position
    }

    pub fn position_mut(&mut self) -> &mut BitPosition {
        &mut self.position
    }

    /// Replace the current position, stopping any search in progress.
    pub fn set_position(&mut self, position: BitPosition) {
        self.stop_search();
        self.position = position;
    }

    /// Reset to the starting position and clear the transposition table.
    pub fn new_game(&mut self) {
        self.stop_search();
        self.position = BitPosition::new();
        self.pool.clear_tt();
    }

    /// Set the number of Lazy-SMP search threads, taking effect on the
    /// next search.
    pub fn set_threads(&mut self, n: usize) {
        self.stop_search();
        if let Some(pool) = Arc::get_mut(&mut self.pool) {
            pool.set_threads(n);
        }
        self.threads = n.max(1);
    }

    #[must_use]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Resize the transposition table, discarding its contents.
    pub fn resize_hash(&mut self, mb: usize) {
        self.stop_search();
        if let Some(pool) = Arc::get_mut(&mut self.pool) {
            pool.resize_tt(mb);
        }
    }

    /// Stop any active search and wait for it to finish.
    pub fn stop_search(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.stop_and_wait();
        }
    }

    /// Signal stop to an active search without blocking.
    pub fn signal_stop(&mut self) {
        if let Some(job) = &self.current_job {
            job.signal_stop();
        }
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.is_some()
    }

    /// Start a search on the current position in the background.
    /// `on_complete` runs on the search-control thread once
    /// `ThreadPool::start_thinking` returns, which happens either because
    /// a limit fired internally or `stop_search`/`signal_stop` was called.
    pub fn start_search<F>(&mut self, limits: SearchLimits, logger: Option<Arc<dyn SearchLogger>>, on_complete: F)
    where
        F: FnOnce(SearchReport) + Send + 'static,
    {
        self.stop_search();

        let pool_for_thread = Arc::clone(&self.pool);
        let position = self.position.clone();
        let handle = thread::Builder::new()
            .name("uci-search".to_string())
            .spawn(move || {
                let report = pool_for_thread.start_thinking_with_logger(&position, limits, logger);
                on_complete(report);
            })
            .expect("failed to spawn search control thread");

        self.current_job = Some(SearchJob { pool: Arc::clone(&self.pool), handle });
    }
}
