// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Client, Overview};
use anyhow::Result;
use shiksha_model::DashboardSnapshot;
use std::time::Duration;
use tracing::{info, warn};

/// Seam over the backend so the store can be driven by a stub in tests.
pub trait AnalyticsTransport {
    fn fetch_full_data(&mut self) -> Result<DashboardSnapshot>;
    fn fetch_overview(&mut self) -> Result<Overview>;
}

impl AnalyticsTransport for Client {
    fn fetch_full_data(&mut self) -> Result<DashboardSnapshot> {
        self.full_data()
    }

    fn fetch_overview(&mut self) -> Result<Overview> {
        self.overview()
    }
}

/// Retry schedule for a single logical load. The backoff is linear:
/// attempt k (1-based) sleeps `backoff_base * k` before retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_base: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, backoff_base: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff_base,
        }
    }

    fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }
}

/// Why a load produced no usable snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("analytics backend unavailable after {attempts} attempts")]
    Unavailable { attempts: u32 },
    #[error("analytics payload malformed: {reason}")]
    InvalidShape { reason: String },
}

type Sleeper = Box<dyn FnMut(Duration)>;

/// Owns the latest dashboard snapshot and the retry loop that refreshes
/// it. A failed load never clobbers data a previous load produced.
pub struct DataStore<T: AnalyticsTransport> {
    transport: T,
    policy: RetryPolicy,
    snapshot: Option<DashboardSnapshot>,
    last_error: Option<FetchError>,
    load_seq: u64,
    sleeper: Sleeper,
}

impl<T: AnalyticsTransport> DataStore<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            snapshot: None,
            last_error: None,
            load_seq: 0,
            sleeper: Box::new(std::thread::sleep),
        }
    }

    /// Replace the inter-attempt sleep. Tests use this to run the retry
    /// loop without real delays.
    pub fn with_sleeper(mut self, sleeper: impl FnMut(Duration) + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Count of loads started so far. Each `load` call gets a fresh
    /// sequence number, so a caller holding an old one can tell its
    /// result has been superseded.
    pub fn load_seq(&self) -> u64 {
        self.load_seq
    }

    /// Fetch the full snapshot, retrying per the policy. On success the
    /// snapshot is validated and replaces the cached one; on failure the
    /// cached snapshot is left untouched and the error is recorded. A
    /// payload that fails validation burns its attempt like a transport
    /// failure; `InvalidShape` only surfaces when the final attempt is
    /// the malformed one.
    pub fn load(&mut self) -> Result<&DashboardSnapshot, FetchError> {
        self.load_seq += 1;
        let seq = self.load_seq;

        let mut last_failure = FetchError::Unavailable {
            attempts: self.policy.attempts,
        };
        for attempt in 1..=self.policy.attempts {
            match self.transport.fetch_full_data() {
                Ok(snapshot) => match snapshot.validate() {
                    Ok(()) => {
                        info!(seq, attempt, "dashboard snapshot loaded");
                        self.last_error = None;
                        return Ok(self.snapshot.insert(snapshot));
                    }
                    Err(error) => {
                        warn!(seq, attempt, %error, "snapshot failed validation");
                        last_failure = FetchError::InvalidShape {
                            reason: error.to_string(),
                        };
                    }
                },
                Err(error) => {
                    warn!(seq, attempt, %error, "snapshot fetch failed");
                    last_failure = FetchError::Unavailable {
                        attempts: self.policy.attempts,
                    };
                }
            }
            if attempt < self.policy.attempts {
                (self.sleeper)(self.policy.backoff_after(attempt));
            }
        }

        warn!(
            seq,
            attempts = self.policy.attempts,
            error = %last_failure,
            "giving up on snapshot load"
        );
        self.last_error = Some(last_failure.clone());
        Err(last_failure)
    }

    /// Single-shot overview fetch, no retries. Used by connectivity
    /// checks where failing fast is the point.
    pub fn check(&mut self) -> Result<Overview> {
        self.transport.fetch_overview()
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalyticsTransport, DataStore, FetchError, Overview, RetryPolicy};
    use anyhow::{Result, bail};
    use shiksha_model::DashboardSnapshot;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    struct FlakyTransport {
        failures_left: u32,
        calls: u32,
    }

    impl FlakyTransport {
        fn failing(times: u32) -> Self {
            Self {
                failures_left: times,
                calls: 0,
            }
        }
    }

    impl AnalyticsTransport for FlakyTransport {
        fn fetch_full_data(&mut self) -> Result<DashboardSnapshot> {
            self.calls += 1;
            if self.failures_left > 0 {
                self.failures_left -= 1;
                bail!("connection refused");
            }
            Ok(shiksha_testkit::sample_snapshot())
        }

        fn fetch_overview(&mut self) -> Result<Overview> {
            bail!("not used")
        }
    }

    struct MalformedTransport {
        malformed_left: u32,
        calls: u32,
    }

    impl MalformedTransport {
        fn serving_garbage(times: u32) -> Self {
            Self {
                malformed_left: times,
                calls: 0,
            }
        }
    }

    impl AnalyticsTransport for MalformedTransport {
        fn fetch_full_data(&mut self) -> Result<DashboardSnapshot> {
            self.calls += 1;
            let mut snapshot = shiksha_testkit::sample_snapshot();
            if self.malformed_left > 0 {
                self.malformed_left -= 1;
                snapshot.months.clear();
            }
            Ok(snapshot)
        }

        fn fetch_overview(&mut self) -> Result<Overview> {
            bail!("not used")
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[test]
    fn succeeds_on_third_attempt_after_two_failures() {
        let mut store =
            DataStore::new(FlakyTransport::failing(2), fast_policy()).with_sleeper(|_| {});
        assert!(store.load().is_ok());
        assert!(store.last_error().is_none());
        assert_eq!(store.snapshot().map(|s| s.months.len()), Some(10));
    }

    #[test]
    fn gives_up_after_exactly_three_attempts() {
        let mut store =
            DataStore::new(FlakyTransport::failing(10), fast_policy()).with_sleeper(|_| {});
        match store.load() {
            Err(FetchError::Unavailable { attempts }) => assert_eq!(attempts, 3),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn backoff_grows_linearly_between_attempts() {
        let sleeps = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&sleeps);
        let mut store = DataStore::new(
            FlakyTransport::failing(10),
            RetryPolicy::new(3, Duration::from_secs(2)),
        )
        .with_sleeper(move |d| recorded.borrow_mut().push(d));

        let _ = store.load();
        assert_eq!(
            *sleeps.borrow(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[test]
    fn failed_load_keeps_the_previous_snapshot() {
        let mut store =
            DataStore::new(FlakyTransport::failing(0), fast_policy()).with_sleeper(|_| {});
        store.load().expect("first load should succeed");
        let kept = store.snapshot().cloned();

        // Subsequent loads hit nothing but failures.
        store.transport.failures_left = 10;
        assert!(store.load().is_err());
        assert_eq!(store.snapshot().cloned(), kept);
        assert!(matches!(
            store.last_error(),
            Some(FetchError::Unavailable { .. })
        ));
    }

    #[test]
    fn malformed_payload_burns_every_attempt_before_invalid_shape() {
        let mut store = DataStore::new(MalformedTransport::serving_garbage(10), fast_policy())
            .with_sleeper(|_| {});
        match store.load() {
            Err(FetchError::InvalidShape { reason }) => {
                assert!(reason.contains("months"));
            }
            other => panic!("expected InvalidShape, got {other:?}"),
        }
        assert_eq!(store.transport.calls, 3);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn malformed_then_valid_payload_recovers_within_one_load() {
        let mut store = DataStore::new(MalformedTransport::serving_garbage(2), fast_policy())
            .with_sleeper(|_| {});
        assert!(store.load().is_ok());
        assert_eq!(store.transport.calls, 3);
        assert!(store.last_error().is_none());
        assert_eq!(store.snapshot().map(|s| s.months.len()), Some(10));
    }

    #[test]
    fn each_load_advances_the_sequence() {
        let mut store =
            DataStore::new(FlakyTransport::failing(0), fast_policy()).with_sleeper(|_| {});
        assert_eq!(store.load_seq(), 0);
        let _ = store.load();
        assert_eq!(store.load_seq(), 1);
        let _ = store.load();
        assert_eq!(store.load_seq(), 2);
    }

    #[test]
    fn successful_load_clears_a_previous_error() {
        let mut store =
            DataStore::new(FlakyTransport::failing(3), fast_policy()).with_sleeper(|_| {});
        assert!(store.load().is_err());
        assert!(store.load().is_ok());
        assert!(store.last_error().is_none());
    }
}
