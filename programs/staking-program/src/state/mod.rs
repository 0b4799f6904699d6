pub mod stake_pool;
pub mod staker_ledger;

pub use stake_pool::*;
pub use staker_ledger::*;
