use crate::constants::{BPS_DENOMINATOR, SECONDS_PER_YEAR};

/// Simple (non-compounding) annual reward rate, prorated per second.
///
/// `reward = amount * rate_bps * elapsed / (10_000 * SECONDS_PER_YEAR)`,
/// rounded down. The product is formed in `u128`; anything that would not
/// fit in a `u64` saturates at `u64::MAX` so the function stays monotone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardAccrualPolicy {
    rate_bps: u16,
}

impl RewardAccrualPolicy {
    pub const fn new(rate_bps: u16) -> Self {
        Self { rate_bps }
    }

    pub fn rate_bps(&self) -> u16 {
        self.rate_bps
    }

    pub fn accrue(&self, amount: u64, elapsed_seconds: u64) -> u64 {
        if amount == 0 || elapsed_seconds == 0 || self.rate_bps == 0 {
            return 0;
        }

        let denominator = u128::from(BPS_DENOMINATOR) * u128::from(SECONDS_PER_YEAR);
        let reward = (u128::from(amount) * u128::from(self.rate_bps))
            .checked_mul(u128::from(elapsed_seconds))
            .map(|numerator| numerator / denominator)
            .unwrap_or(u128::MAX);

        u64::try_from(reward).unwrap_or(u64::MAX)
    }
}
