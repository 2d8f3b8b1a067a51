//! Lazy-SMP thread pool: every worker searches the same root position to
//! completion against a shared transposition table; there is no explicit
//! work-splitting. Thread 0 is the reporting thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::board::position::BitPosition;
use crate::board::tt::{TranspositionTable, DEFAULT_TT_MB};

use super::{SearchLimits, SearchLogger, SearchReport, Worker};

/// 32 MiB per search thread, enough headroom for the recursive alpha-beta
/// call depth this engine reaches.
const SEARCH_THREAD_STACK_SIZE: usize = 32 * 1024 * 1024;

pub struct ThreadPool {
    size: usize,
    tt: Arc<TranspositionTable>,
    stop: Arc<AtomicBool>,
}

impl ThreadPool {
    #[must_use]
    pub fn new(threads: usize, tt_mb: usize) -> Self {
        ThreadPool {
            size: threads.max(1),
            tt: Arc::new(TranspositionTable::new(tt_mb)),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Resize the pool to `n` worker threads.
    pub fn set_threads(&mut self, n: usize) {
        self.size = n.max(1);
    }

    #[must_use]
    pub fn threads(&self) -> usize {
        self.size
    }

    /// Resize the shared transposition table, discarding its contents.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = Arc::new(TranspositionTable::new(mb));
    }

    pub fn clear_tt(&self) {
        self.tt.clear();
    }

    /// Request the currently running search to stop at its next boundary.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Clone `position` into every worker and run iterative deepening on
    /// each under `limits` until the stop flag fires or a worker's own
    /// stopping condition is met. Blocks until every worker has returned;
    /// reports thread 0's result, matching the spec's "main thread prints
    /// bestmove" rule.
    #[must_use]
    pub fn start_thinking(&self, position: &BitPosition, limits: SearchLimits) -> SearchReport {
        self.start_thinking_with_logger(position, limits, None)
    }

    /// Same as [`ThreadPool::start_thinking`], but thread 0 reports its
    /// iterations to `logger` as it searches.
    #[must_use]
    pub fn start_thinking_with_logger(
        &self,
        position: &BitPosition,
        limits: SearchLimits,
        logger: Option<Arc<dyn SearchLogger>>,
    ) -> SearchReport {
        self.stop.store(false, Ordering::Relaxed);

        let mut handles = Vec::with_capacity(self.size);
        for id in 0..self.size {
            let position = position.clone();
            let tt = Arc::clone(&self.tt);
            let stop = Arc::clone(&self.stop);
            let limits = limits.clone();
            let logger = if id == 0 { logger.clone() } else { None };
            let handle = thread::Builder::new()
                .name(format!("search-{id}"))
                .stack_size(SEARCH_THREAD_STACK_SIZE)
                .spawn(move || {
                    let mut worker = Worker::new(id, position, tt, stop);
                    worker.think_with_logger(&limits, logger.as_deref())
                })
                .expect("failed to spawn search worker thread");
            handles.push(handle);
        }

        let mut reports: Vec<Option<SearchReport>> =
            handles.into_iter().map(|h| h.join().ok()).collect();

        reports[0].take().unwrap_or_else(|| {
            reports
                .into_iter()
                .flatten()
                .max_by_key(|r| r.depth)
                .expect("at least one worker must return a report")
        })
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        ThreadPool::new(1, DEFAULT_TT_MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_threaded_pool_finds_a_move() {
        let pool = ThreadPool::new(1, 1);
        let limits = SearchLimits { depth: Some(3), ..Default::default() };
        let report = pool.start_thinking(&BitPosition::new(), limits);
        assert_ne!(report.best_move, crate::board::types::Move::null());
    }

    #[test]
    fn multi_threaded_pool_reports_thread_zero() {
        let pool = ThreadPool::new(2, 1);
        let limits = SearchLimits { depth: Some(2), ..Default::default() };
        let report = pool.start_thinking(&BitPosition::new(), limits);
        assert_ne!(report.best_move, crate::board::types::Move::null());
    }
}
