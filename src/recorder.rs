//! Interval storage shared between the sampling worker and readers
//!
//! Two stores behind one lock: a bounded rolling window feeding the live
//! statistics, and a capped append log feeding the final report. The lock
//! is held only for the append or the copy itself.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct Stores {
    window: VecDeque<u64>,
    full: Vec<u64>,
}

/// Thread-safe interval store. Durations are nanoseconds.
pub struct IntervalRecorder {
    stores: Mutex<Stores>,
    window_capacity: usize,
    sample_cap: usize,
}

impl IntervalRecorder {
    /// `window_capacity` bounds the rolling window; `sample_cap` bounds the
    /// append log (a session completes when it fills).
    pub fn new(window_capacity: usize, sample_cap: usize) -> Self {
        let window_capacity = window_capacity.max(1);
        let sample_cap = sample_cap.max(1);
        Self {
            stores: Mutex::new(Stores {
                window: VecDeque::with_capacity(window_capacity),
                full: Vec::new(),
            }),
            window_capacity,
            sample_cap,
        }
    }

    // The critical sections cannot leave the buffers inconsistent, so a
    // poisoned lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Stores> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one interval to both stores atomically. Returns true once the
    /// append log has reached its cap; further appends are dropped.
    pub fn record(&self, duration_ns: u64) -> bool {
        let mut stores = self.lock();
        if stores.full.len() >= self.sample_cap {
            return true;
        }
        if stores.window.len() == self.window_capacity {
            stores.window.pop_front();
        }
        stores.window.push_back(duration_ns);
        stores.full.push(duration_ns);
        stores.full.len() >= self.sample_cap
    }

    /// Independent copy of the rolling window, oldest first.
    pub fn snapshot_window(&self) -> Vec<u64> {
        self.lock().window.iter().copied().collect()
    }

    /// Independent copy of the full append log.
    pub fn snapshot_full(&self) -> Vec<u64> {
        self.lock().full.clone()
    }

    /// Length of the append log.
    pub fn len(&self) -> usize {
        self.lock().full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current rolling-window length (<= capacity).
    pub fn window_len(&self) -> usize {
        self.lock().window.len()
    }

    /// Whether the append log has reached its cap.
    pub fn is_full(&self) -> bool {
        self.len() >= self.sample_cap
    }

    pub fn window_capacity(&self) -> usize {
        self.window_capacity
    }

    pub fn sample_cap(&self) -> usize {
        self.sample_cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_to_both_stores() {
        let rec = IntervalRecorder::new(10, 100);
        rec.record(1_000_000);
        rec.record(2_000_000);
        assert_eq!(rec.snapshot_window(), vec![1_000_000, 2_000_000]);
        assert_eq!(rec.snapshot_full(), vec![1_000_000, 2_000_000]);
    }

    #[test]
    fn window_evicts_oldest_at_capacity() {
        let rec = IntervalRecorder::new(3, 100);
        for i in 1..=5 {
            rec.record(i);
        }
        assert_eq!(rec.snapshot_window(), vec![3, 4, 5]);
        assert_eq!(rec.window_len(), 3);
        // The full log keeps everything
        assert_eq!(rec.snapshot_full(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn record_signals_when_cap_reached() {
        let rec = IntervalRecorder::new(10, 3);
        assert!(!rec.record(1));
        assert!(!rec.record(2));
        assert!(rec.record(3));
        assert!(rec.is_full());
    }

    #[test]
    fn log_never_exceeds_cap() {
        let rec = IntervalRecorder::new(10, 3);
        for i in 0..10 {
            rec.record(i);
        }
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.snapshot_full(), vec![0, 1, 2]);
    }

    #[test]
    fn appends_past_cap_do_not_touch_window() {
        let rec = IntervalRecorder::new(10, 2);
        rec.record(1);
        rec.record(2);
        rec.record(3);
        assert_eq!(rec.snapshot_window(), vec![1, 2]);
    }

    #[test]
    fn snapshots_are_independent_copies() {
        let rec = IntervalRecorder::new(10, 100);
        rec.record(1);
        let before = rec.snapshot_full();
        rec.record(2);
        assert_eq!(before, vec![1]);
        assert_eq!(rec.snapshot_full(), vec![1, 2]);
    }

    #[test]
    fn zero_capacities_are_clamped() {
        let rec = IntervalRecorder::new(0, 0);
        assert_eq!(rec.window_capacity(), 1);
        assert_eq!(rec.sample_cap(), 1);
        assert!(rec.record(5));
    }

    #[test]
    fn concurrent_writer_and_reader() {
        use std::sync::Arc;
        use std::thread;

        let rec = Arc::new(IntervalRecorder::new(100, 10_000));
        let writer = {
            let rec = Arc::clone(&rec);
            thread::spawn(move || {
                for i in 0..10_000u64 {
                    rec.record(i);
                }
            })
        };
        // Reader observes monotonically growing, internally consistent logs
        let mut last_len = 0;
        while !rec.is_full() {
            let snap = rec.snapshot_full();
            assert!(snap.len() >= last_len);
            last_len = snap.len();
            assert!(rec.window_len() <= rec.window_capacity());
        }
        writer.join().expect("writer thread panicked");
        assert_eq!(rec.len(), 10_000);
    }
}
