use std::time::{Duration, Instant};

use log::trace;

use crate::search::SearchError;

/// Milliseconds left in the current turn. Sampled by the search, never owned by it.
pub trait TimeBudget {
    fn remaining_ms(&self) -> f64;
}

impl<F: Fn() -> f64> TimeBudget for F {
    fn remaining_ms(&self) -> f64 { self() }
}

/// Wall-clock budget ending at a fixed instant.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    end: Instant,
}

impl Deadline {
    pub fn after(d: Duration) -> Self { Self { end: Instant::now() + d } }

    pub fn after_ms(ms: u64) -> Self { Self::after(Duration::from_millis(ms)) }
}

impl TimeBudget for Deadline {
    fn remaining_ms(&self) -> f64 {
        let now = Instant::now();
        if now >= self.end {
            -(now.duration_since(self.end).as_secs_f64() * 1000.0)
        } else {
            self.end.duration_since(now).as_secs_f64() * 1000.0
        }
    }
}

/// Per-search view of the budget: every recursive frame calls [`SearchClock::check`]
/// before touching the board.
pub(crate) struct SearchClock<'a, T: TimeBudget + ?Sized> {
    budget: &'a T,
    threshold_ms: f64,
}

impl<'a, T: TimeBudget + ?Sized> SearchClock<'a, T> {
    pub(crate) fn new(budget: &'a T, threshold_ms: f64) -> Self { Self { budget, threshold_ms } }

    pub(crate) fn remaining_ms(&self) -> f64 { self.budget.remaining_ms() }

    pub(crate) fn check(&self) -> Result<(), SearchError> {
        let remaining_ms = self.budget.remaining_ms();
        if remaining_ms < self.threshold_ms {
            trace!("budget exhausted: {remaining_ms:.2}ms < {:.2}ms", self.threshold_ms);
            return Err(SearchError::Cancelled { remaining_ms, threshold_ms: self.threshold_ms });
        }
        Ok(())
    }
}
