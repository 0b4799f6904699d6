//! Pure, stateless policies consulted by the staker ledger.
//!
//! Neither policy reads a clock or touches account state; callers pass the
//! elapsed time they have already derived from an explicit `now`.

pub mod accrual;
pub mod lock;

pub use accrual::*;
pub use lock::*;

/// Seconds elapsed between `since` and `now`, treating a clock that reads
/// earlier than `since` as zero elapsed.
pub fn elapsed_seconds(since: i64, now: i64) -> u64 {
    u64::try_from(now.saturating_sub(since)).unwrap_or(0)
}
