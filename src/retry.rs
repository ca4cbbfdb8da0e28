//! Retry policy for completion calls.
//!
//! Failed attempts are retried with fixed exponential backoff when the
//! status looks transient. The policy is small and fixed: up to
//! [`MAX_RETRIES`] additional attempts with delays of 1, 2 and 4 seconds.
//! The retry loop itself lives in [`NebiusClient`](crate::NebiusClient);
//! this module owns the classification and the arithmetic.

use std::time::Duration;

use crate::error::TransportError;

/// Maximum number of additional attempts after the first failure.
pub const MAX_RETRIES: u32 = 3;

/// Base backoff delay in milliseconds; doubles on each retry.
pub const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Determines whether a failed attempt should be retried.
///
/// Retryable statuses are 400, 429 and 500 through 504. Failures without a
/// status (connection errors and the like) are terminal. 400 is
/// intentionally part of the set.
pub fn is_retryable(err: &TransportError) -> bool {
    match err.status {
        Some(status) => status == 400 || status == 429 || (500..=504).contains(&status),
        None => false,
    }
}

/// Backoff before retry `n` (1-based): `RETRY_BASE_DELAY_MS * 2^(n-1)`.
///
/// For the default constants that is 1000ms, 2000ms, 4000ms.
pub fn backoff_delay(retry: u32) -> Duration {
    let exp = 2u64.saturating_pow(retry.saturating_sub(1));
    Duration::from_millis(RETRY_BASE_DELAY_MS.saturating_mul(exp))
}
