//! Progress feedback for dispatched tasks.
//!
//! The tracker counts completion notifications and drives a progress bar.
//! It never stores outcomes and nothing reads it to make decisions.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, PoisonError};

/// Thread-safe completion counter with an optional progress bar.
pub struct ProgressTracker {
    bar: ProgressBar,
    completed: Mutex<u64>,
}

impl ProgressTracker {
    /// Create a tracker expecting `total` notifications.
    ///
    /// With `visible == false` the bar is hidden but counting still works.
    pub fn new(total: u64, visible: bool) -> Self {
        let bar = if visible {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("🚀 |{bar:30.cyan/blue}| {percent:>3}% [{pos}/{len}] {elapsed_precise} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            completed: Mutex::new(0),
        }
    }

    /// A tracker that never draws anything.
    #[allow(dead_code)] // Used by tests across modules
    pub fn hidden(total: u64) -> Self {
        Self::new(total, false)
    }

    /// Record one finished task. Returns the number recorded so far.
    pub fn record(&self, label: &str) -> u64 {
        let mut completed = self.completed.lock().unwrap_or_else(PoisonError::into_inner);
        *completed += 1;
        self.bar.set_message(label.to_string());
        self.bar.inc(1);
        *completed
    }

    /// Number of notifications received.
    pub fn completed(&self) -> u64 {
        *self.completed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop drawing and leave the final state on screen.
    pub fn finish(&self) {
        self.bar.finish_with_message("all tasks settled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_counts() {
        let tracker = ProgressTracker::hidden(3);
        assert_eq!(tracker.record("pslist"), 1);
        assert_eq!(tracker.record("netscan (timed out)"), 2);
        assert_eq!(tracker.completed(), 2);
        tracker.finish();
    }

    #[test]
    fn test_concurrent_records() {
        let tracker = Arc::new(ProgressTracker::hidden(800));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    for j in 0..100 {
                        tracker.record(&format!("task-{}-{}", i, j));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(tracker.completed(), 800);
    }
}
