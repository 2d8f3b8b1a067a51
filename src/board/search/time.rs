//! Time budgeting: UCI `go` limits in, a per-move wall-clock budget out.

use std::time::{Duration, Instant};

use crate::board::types::Color;

use super::constants::TIME_PREDICTION_FACTOR;

/// Limits as parsed off a UCI `go` command.
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    pub white_time: Option<Duration>,
    pub black_time: Option<Duration>,
    pub white_inc: Duration,
    pub black_inc: Duration,
    pub movetime: Option<Duration>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub infinite: bool,
}

impl SearchLimits {
    /// The effective time budget for `side`: an explicit `movetime`, or
    /// `clock + increment`, or `None` for a depth-only / infinite search.
    #[must_use]
    pub fn budget_for(&self, side: Color) -> Option<Duration> {
        if let Some(movetime) = self.movetime {
            return Some(movetime);
        }
        if self.infinite {
            return None;
        }
        let (clock, inc) = match side {
            Color::White => (self.white_time, self.white_inc),
            Color::Black => (self.black_time, self.black_inc),
        };
        clock.map(|c| c.saturating_add(inc))
    }
}

/// Tracks elapsed time and predicts whether the next iteration would blow
/// the budget, per the engine's empirical 17x-previous-iteration rule.
pub struct TimeManager {
    started: Instant,
    budget: Option<Duration>,
    last_iteration: Duration,
}

impl TimeManager {
    #[must_use]
    pub fn new(budget: Option<Duration>) -> Self {
        TimeManager { started: Instant::now(), budget, last_iteration: Duration::ZERO }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.budget.is_some_and(|b| self.elapsed() >= b)
    }

    pub fn record_iteration(&mut self, duration: Duration) {
        self.last_iteration = duration;
    }

    /// Would starting another iteration, predicted at
    /// `TIME_PREDICTION_FACTOR` times the last one's duration, overrun the
    /// budget?
    #[must_use]
    pub fn should_stop_before_next_iteration(&self) -> bool {
        let Some(budget) = self.budget else { return false };
        let predicted = self.last_iteration.saturating_mul(TIME_PREDICTION_FACTOR);
        self.elapsed().saturating_add(predicted) > budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movetime_overrides_clock_and_increment() {
        let limits = SearchLimits {
            movetime: Some(Duration::from_millis(500)),
            white_time: Some(Duration::from_secs(60)),
            ..Default::default()
        };
        assert_eq!(limits.budget_for(Color::White), Some(Duration::from_millis(500)));
    }

    #[test]
    fn budget_is_clock_plus_increment() {
        let limits = SearchLimits {
            white_time: Some(Duration::from_secs(10)),
            white_inc: Duration::from_millis(100),
            ..Default::default()
        };
        assert_eq!(limits.budget_for(Color::White), Some(Duration::from_millis(10100)));
    }

    #[test]
    fn infinite_search_has_no_budget() {
        let limits = SearchLimits { infinite: true, ..Default::default() };
        assert_eq!(limits.budget_for(Color::White), None);
    }

    #[test]
    fn predicted_next_iteration_past_budget_stops_early() {
        let mut tm = TimeManager::new(Some(Duration::from_millis(100)));
        tm.record_iteration(Duration::from_millis(50));
        assert!(tm.should_stop_before_next_iteration());
    }
}
