//! Good-for-day expiry: configuration and the background pruning worker.
//!
//! A single worker thread wakes shortly after a daily local-time cutoff and
//! cancels every resident good-for-day order. The timed wait runs on the
//! book mutex's condition variable so shutdown can interrupt it promptly.

use chrono::{DateTime, Local, Timelike};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, trace};

use super::book::Shared;
use super::error::OrderBookError;

/// Default local cutoff hour: 16:00.
pub const DEFAULT_CUTOFF_HOUR: u32 = 16;

/// Default slack added past the cutoff so the cutoff minute is strictly
/// behind us when the worker wakes.
pub const DEFAULT_SLACK: Duration = Duration::from_millis(100);

/// Interval to retry after a failed local-time computation.
const CLOCK_RETRY: Duration = Duration::from_secs(3600);

/// When the daily good-for-day cutoff fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryConfig {
    cutoff_hour: u32,
    slack: Duration,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            cutoff_hour: DEFAULT_CUTOFF_HOUR,
            slack: DEFAULT_SLACK,
        }
    }
}

impl ExpiryConfig {
    /// Create a config with an explicit cutoff hour and slack.
    ///
    /// # Errors
    /// Returns [`OrderBookError::InvalidCutoffHour`] when `cutoff_hour` is
    /// not within `0..24`.
    pub fn new(cutoff_hour: u32, slack: Duration) -> Result<Self, OrderBookError> {
        if cutoff_hour >= 24 {
            return Err(OrderBookError::InvalidCutoffHour { hour: cutoff_hour });
        }
        Ok(Self { cutoff_hour, slack })
    }

    /// The local hour at which good-for-day orders expire.
    #[must_use]
    #[inline]
    pub fn cutoff_hour(&self) -> u32 {
        self.cutoff_hour
    }

    /// The slack added past the cutoff before the worker wakes.
    #[must_use]
    #[inline]
    pub fn slack(&self) -> Duration {
        self.slack
    }

    /// The next local cutoff instant: today at the cutoff hour, or tomorrow
    /// if the cutoff hour has already begun.
    fn next_cutoff(&self) -> Option<DateTime<Local>> {
        let now = Local::now();
        let mut date = now.date_naive();
        if now.hour() >= self.cutoff_hour {
            date = date.succ_opt()?;
        }
        // A DST transition can make the cutoff ambiguous; take the earlier
        // of the two candidate instants.
        date.and_hms_opt(self.cutoff_hour, 0, 0)?
            .and_local_timezone(Local)
            .earliest()
    }

    /// How long the worker should wait before the next pruning pass,
    /// including the slack.
    pub(super) fn wait_until_cutoff(&self) -> Duration {
        match self.next_cutoff() {
            Some(cutoff) => {
                let until = (cutoff - Local::now()).to_std().unwrap_or_default();
                until + self.slack
            }
            // Nonexistent local time (DST gap at the cutoff); try again
            // later rather than aborting the worker.
            None => CLOCK_RETRY,
        }
    }
}

/// Worker loop: wait out each day's cutoff, then cancel every resident
/// good-for-day order. Exits when the shutdown flag is raised.
pub(super) fn run(shared: Arc<Shared>, config: ExpiryConfig) {
    loop {
        let wait = config.wait_until_cutoff();
        trace!("expiry worker sleeping {wait:?} until next cutoff");

        {
            let guard = shared.lock();
            if shared.shutdown.load(Ordering::Acquire) {
                return;
            }
            let (_guard, result) = shared
                .shutdown_signal
                .wait_timeout_while(guard, wait, |_| {
                    !shared.shutdown.load(Ordering::Acquire)
                })
                .expect("order book mutex poisoned");
            if !result.timed_out() || shared.shutdown.load(Ordering::Acquire) {
                return;
            }
        }

        let expired = {
            let state = shared.lock();
            state.good_for_day_ids()
        };

        if expired.is_empty() {
            continue;
        }

        debug!("expiring {} good-for-day orders at cutoff", expired.len());

        // Batch-cancel under one lock; ids already gone are no-ops.
        let mut state = shared.lock();
        for id in expired {
            state.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_trading_day() {
        let config = ExpiryConfig::default();
        assert_eq!(config.cutoff_hour(), 16);
        assert_eq!(config.slack(), Duration::from_millis(100));
    }

    #[test]
    fn cutoff_hour_is_validated() {
        assert!(ExpiryConfig::new(24, DEFAULT_SLACK).is_err());
        assert!(ExpiryConfig::new(0, DEFAULT_SLACK).is_ok());
        assert!(ExpiryConfig::new(23, DEFAULT_SLACK).is_ok());
    }

    #[test]
    fn wait_is_positive_and_bounded_by_a_day() {
        let config = ExpiryConfig::default();
        let wait = config.wait_until_cutoff();
        assert!(wait >= DEFAULT_SLACK);
        // next cutoff is at most ~24h out, plus slack
        assert!(wait <= Duration::from_secs(25 * 3600));
    }
}
