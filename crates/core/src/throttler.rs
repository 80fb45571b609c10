//! Counting semaphore for interception work.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Bounds the number of payloads being validated at once.
///
/// Shared by every interceptor in one container. `start_processing` claims a
/// slot with a compare-and-swap, so the configured maximum is a hard bound
/// even under contention.
#[derive(Debug)]
pub struct JobThrottler {
    in_flight: AtomicUsize,
    max_jobs: usize,
}

impl JobThrottler {
    /// Create a throttler admitting at most `max_jobs` concurrent jobs.
    ///
    /// # Panics
    ///
    /// Panics if `max_jobs` is zero; the bound is a call-site constant, not
    /// runtime configuration.
    pub fn new(max_jobs: usize) -> Self {
        assert!(max_jobs > 0, "throttler bound must be positive");
        Self {
            in_flight: AtomicUsize::new(0),
            max_jobs,
        }
    }

    /// Whether a slot is currently free.
    pub fn can_process(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) < self.max_jobs
    }

    /// Try to claim a slot. Returns false when saturated.
    pub fn start_processing(&self) -> bool {
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_jobs).then_some(n + 1)
            })
            .is_ok()
    }

    /// Release a previously claimed slot.
    pub fn end_processing(&self) {
        let prev = self.in_flight.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "end_processing without start_processing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_slots_exhaust_and_release() {
        let throttler = JobThrottler::new(2);
        assert!(throttler.start_processing());
        assert!(throttler.start_processing());
        assert!(!throttler.can_process());
        assert!(!throttler.start_processing());

        throttler.end_processing();
        assert!(throttler.can_process());
        assert!(throttler.start_processing());
    }

    #[test]
    fn test_bound_holds_under_contention() {
        let max = 8;
        let throttler = Arc::new(JobThrottler::new(max));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let throttler = Arc::clone(&throttler);
                let peak = Arc::clone(&peak);
                thread::spawn(move || {
                    for _ in 0..200 {
                        if throttler.start_processing() {
                            let current = throttler.in_flight.load(Ordering::Acquire);
                            peak.fetch_max(current, Ordering::AcqRel);
                            throttler.end_processing();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(peak.load(Ordering::Acquire) <= max);
    }
}
