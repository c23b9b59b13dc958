use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Point-in-time view of a batch run's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub completed: usize,
    pub total: usize,
}

/// Shared completion counter for one batch run.
///
/// Owned by the scheduler; workers get increment-only access via the
/// aggregator, observers get read-only snapshots. `completed` is monotone
/// non-decreasing between resets and never exceeds `total`.
#[derive(Debug, Default)]
pub struct BatchProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl BatchProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new batch: zero the counter and record the batch size.
    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    /// Record one finished lookup (success or failure).
    pub fn mark_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ProgressState {
        ProgressState {
            completed: self.completed.load(Ordering::SeqCst),
            total: self.total.load(Ordering::SeqCst),
        }
    }
}
