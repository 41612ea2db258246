//! Exponential backoff with jitter for failed cycles.

use rand::Rng;
use std::time::Duration;

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter).min(Duration::from_millis(max_ms.max(base_ms)))
}

/// Delay before the next cycle after `consecutive_failures` failed cycles.
///
/// Never shorter than `interval_ms` and never longer than
/// `max_ms`. With `max_ms == interval_ms` this is the fixed polling interval.
pub fn retry_delay(consecutive_failures: u32, interval_ms: u64, max_ms: u64) -> Duration {
    let max_ms = max_ms.max(interval_ms);
    if consecutive_failures == 0 || max_ms == interval_ms {
        return Duration::from_millis(interval_ms);
    }
    calculate_backoff(consecutive_failures, interval_ms, max_ms).max(Duration::from_millis(interval_ms))
}
