//! Nonces and signature deadlines.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::U256;
use chrono::Utc;

use crate::{Error, Result};

/// Default validity window of a signature, in seconds.
pub const DEFAULT_SIGNATURE_VALIDITY_SECS: u64 = 60;

/// Deadline signed into resting (GTC and trigger) orders. Far enough in the
/// future that the order never expires on its own.
pub const CONDITIONAL_ORDER_DEADLINE: u64 = 1_000_000_000_000_000_000;

/// Source of wall-clock time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Milliseconds since the unix epoch.
    fn now_ms(&self) -> u64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Clamp clocks set before 1970.
        Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Produces a nonce per signed request.
pub trait NonceSource: Send + Sync {
    fn next_nonce(&self) -> u64;
}

/// Current time in milliseconds.
///
/// Increasing under sequential use, but two calls in the same millisecond
/// return the same value. Use [`MonotonicNonce`] when signing concurrently.
#[derive(Clone)]
pub struct WallClockNonce {
    clock: Arc<dyn Clock>,
}

impl WallClockNonce {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for WallClockNonce {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl NonceSource for WallClockNonce {
    fn next_nonce(&self) -> u64 {
        self.clock.now_ms()
    }
}

/// Millisecond timestamp that never repeats: `max(now_ms, last + 1)`.
pub struct MonotonicNonce {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
}

impl MonotonicNonce {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }
}

impl Default for MonotonicNonce {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl NonceSource for MonotonicNonce {
    fn next_nonce(&self) -> u64 {
        let now = self.clock.now_ms();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

impl std::fmt::Debug for MonotonicNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonotonicNonce")
            .field("last", &self.last.load(Ordering::Relaxed))
            .finish()
    }
}

/// Pack account, timestamp and market into a single orders-gateway nonce:
/// `(account_id << 98) | (timestamp_ms << 32) | market_id`.
pub fn orders_gateway_nonce(account_id: u128, market_id: u64, timestamp_ms: u64) -> Result<U256> {
    if market_id > u64::from(u32::MAX) {
        return Err(Error::validation(format!(
            "marketId {market_id} is out of range for the orders gateway nonce"
        )));
    }

    Ok((U256::from(account_id) << 98) | (U256::from(timestamp_ms) << 32) | U256::from(market_id))
}

/// Signature expiry timestamps.
#[derive(Clone)]
pub struct DeadlineCalculator {
    clock: Arc<dyn Clock>,
}

impl DeadlineCalculator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Unix seconds `validity_secs` from now. A zero window would expire
    /// the signature at the moment it is made and is rejected.
    pub fn deadline(&self, validity_secs: u64) -> Result<u64> {
        if validity_secs == 0 {
            return Err(Error::validation("signature validity must be at least one second"));
        }
        Ok((self.clock.now_ms() / 1000).saturating_add(validity_secs))
    }

    pub fn default_deadline(&self) -> Result<u64> {
        self.deadline(DEFAULT_SIGNATURE_VALIDITY_SECS)
    }
}

impl Default for DeadlineCalculator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for DeadlineCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeadlineCalculator").finish_non_exhaustive()
    }
}
