//! Sliding-window rate limiting on top of the `ratelimits` dataset.

use std::sync::Arc;

use crownshield_core_store::Error;

use crate::clock::{Clock, SystemClock};
use crate::records::{RateLimitBucket, RateLimits};
use crate::store::DatasetStore;

/// One limiter rule: at most `max` permitted events per `window_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitOptions {
    pub key: String,
    pub window_ms: i64,
    pub max: usize,
}

impl RateLimitOptions {
    pub fn new(key: impl Into<String>, window_ms: i64, max: usize) -> Self {
        Self {
            key: key.into(),
            window_ms,
            max,
        }
    }
}

pub struct RateLimiter {
    store: Arc<DatasetStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(store: Arc<DatasetStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<DatasetStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Record an event for `caller_id` under `options.key` unless the window
    /// is already full. Returns `true` when the caller is limited.
    pub async fn is_limited(&self, caller_id: &str, options: &RateLimitOptions) -> Result<bool, Error> {
        let now = self.clock.now_millis();
        let mut limited = false;

        self.store
            .update_dataset::<RateLimits, Error, _, _>(|mut buckets| {
                limited = check_bucket(&mut buckets, caller_id, options, now);
                async move { Ok(buckets) }
            })
            .await?;

        if limited {
            tracing::debug!(caller = caller_id, key = %options.key, "rate limited");
        }
        Ok(limited)
    }
}

/// Apply one limiter check to `buckets` in place.
///
/// The caller's bucket is pruned to `[now - window, ..]` and either
/// rejected (count `>= max`) or extended with `now`. Other buckets that
/// carry a recorded window are pruned the same way. Empty buckets are
/// removed.
pub fn check_bucket(
    buckets: &mut Vec<RateLimitBucket>,
    caller_id: &str,
    options: &RateLimitOptions,
    now: i64,
) -> bool {
    let own = buckets
        .iter()
        .position(|bucket| bucket.ip == caller_id && bucket.key == options.key);

    for (index, bucket) in buckets.iter_mut().enumerate() {
        if Some(index) == own {
            continue;
        }
        if let Some(window_ms) = bucket.window_ms {
            prune(&mut bucket.timestamps, now, window_ms);
        }
    }

    let limited = match own {
        Some(index) => {
            let bucket = &mut buckets[index];
            bucket.window_ms = Some(options.window_ms);
            prune(&mut bucket.timestamps, now, options.window_ms);
            admit(bucket, options.max, now)
        }
        None => {
            let mut bucket = RateLimitBucket {
                ip: caller_id.to_string(),
                key: options.key.clone(),
                timestamps: Vec::new(),
                window_ms: Some(options.window_ms),
            };
            let limited = admit(&mut bucket, options.max, now);
            buckets.push(bucket);
            limited
        }
    };

    buckets.retain(|bucket| !bucket.timestamps.is_empty());
    limited
}

fn prune(timestamps: &mut Vec<i64>, now: i64, window_ms: i64) {
    let cutoff = now.saturating_sub(window_ms);
    timestamps.retain(|&at| at >= cutoff);
}

fn admit(bucket: &mut RateLimitBucket, max: usize, now: i64) -> bool {
    if bucket.timestamps.len() >= max {
        true
    } else {
        bucket.timestamps.push(now);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(ip: &str, key: &str, timestamps: &[i64], window_ms: Option<i64>) -> RateLimitBucket {
        RateLimitBucket {
            ip: ip.to_string(),
            key: key.to_string(),
            timestamps: timestamps.to_vec(),
            window_ms,
        }
    }

    #[test]
    fn creates_bucket_on_first_event() {
        let mut buckets = Vec::new();
        let options = RateLimitOptions::new("comment", 1_000, 2);

        assert!(!check_bucket(&mut buckets, "10.0.0.1", &options, 5_000));
        assert_eq!(buckets, vec![bucket("10.0.0.1", "comment", &[5_000], Some(1_000))]);
    }

    #[test]
    fn full_window_is_limited_and_not_extended() {
        let mut buckets = vec![bucket("10.0.0.1", "comment", &[4_500, 4_800], Some(1_000))];
        let options = RateLimitOptions::new("comment", 1_000, 2);

        assert!(check_bucket(&mut buckets, "10.0.0.1", &options, 5_000));
        assert_eq!(buckets[0].timestamps, vec![4_500, 4_800]);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let mut buckets = vec![bucket("10.0.0.1", "comment", &[4_000], None)];
        let options = RateLimitOptions::new("comment", 1_000, 1);

        assert!(check_bucket(&mut buckets, "10.0.0.1", &options, 5_000));

        assert!(!check_bucket(&mut buckets, "10.0.0.1", &options, 5_001));
        assert_eq!(buckets[0].timestamps, vec![5_001]);
    }

    #[test]
    fn zero_max_always_limits_without_storing() {
        let mut buckets = Vec::new();
        let options = RateLimitOptions::new("upload", 60_000, 0);

        assert!(check_bucket(&mut buckets, "10.0.0.1", &options, 1));
        assert!(buckets.is_empty());
    }

    #[test]
    fn sweeps_stale_buckets_of_other_callers() {
        let mut buckets = vec![
            bucket("10.0.0.2", "comment", &[100], Some(1_000)),
            bucket("10.0.0.3", "like", &[100, 4_900], Some(1_000)),
            bucket("10.0.0.4", "legacy", &[100], None),
        ];
        let options = RateLimitOptions::new("comment", 1_000, 5);

        assert!(!check_bucket(&mut buckets, "10.0.0.1", &options, 5_000));

        assert_eq!(
            buckets,
            vec![
                bucket("10.0.0.3", "like", &[4_900], Some(1_000)),
                bucket("10.0.0.4", "legacy", &[100], None),
                bucket("10.0.0.1", "comment", &[5_000], Some(1_000)),
            ]
        );
    }

    #[test]
    fn keys_are_independent() {
        let mut buckets = Vec::new();
        let comment = RateLimitOptions::new("comment", 1_000, 1);
        let like = RateLimitOptions::new("like", 1_000, 1);

        assert!(!check_bucket(&mut buckets, "10.0.0.1", &comment, 10));
        assert!(!check_bucket(&mut buckets, "10.0.0.1", &like, 10));
        assert!(check_bucket(&mut buckets, "10.0.0.1", &comment, 11));
        assert_eq!(buckets.len(), 2);
    }
}
