/// Minimum time a position must stay staked before it can be released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockPolicy {
    lock_duration: u64,
}

impl LockPolicy {
    pub const fn new(lock_duration: u64) -> Self {
        Self { lock_duration }
    }

    pub fn lock_duration(&self) -> u64 {
        self.lock_duration
    }

    pub fn is_unlocked(&self, elapsed_since_deposit: u64) -> bool {
        elapsed_since_deposit >= self.lock_duration
    }

    /// Seconds left before a position of the given age unlocks.
    pub fn remaining(&self, elapsed_since_deposit: u64) -> u64 {
        self.lock_duration.saturating_sub(elapsed_since_deposit)
    }
}
