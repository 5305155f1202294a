//! Delivery metrics for observability
//!
//! Counters for how many records a handler dispatched and how many of
//! those reached the webhook. In asynchronous mode these are the only
//! caller-visible trace of failed deliveries besides the error callback.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for handler observability
///
/// # Example
///
/// ```
/// use slack_log_sink::DeliveryMetrics;
///
/// let metrics = DeliveryMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_failed();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.failed(), 1);
/// ```
#[derive(Debug)]
pub struct DeliveryMetrics {
    /// Records handed to the delivery path (sync or background)
    dispatched: AtomicU64,

    /// Records accepted by the webhook
    delivered: AtomicU64,

    /// Records lost to a formatting or transport failure
    failed: AtomicU64,
}

impl DeliveryMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Dispatches that have not completed either way yet
    pub fn in_flight(&self) -> u64 {
        self.dispatched()
            .saturating_sub(self.delivered() + self.failed())
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Get failure rate as a percentage (0.0 - 100.0) of completed dispatches
    ///
    /// Returns 0.0 if nothing has completed yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = self.delivered() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}

impl Default for DeliveryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DeliveryMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched()),
            delivered: AtomicU64::new(self.delivered()),
            failed: AtomicU64::new(self.failed()),
        }
    }
}
