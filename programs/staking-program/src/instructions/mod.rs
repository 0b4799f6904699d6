pub mod fund_rewards;
pub mod get_rewards;
pub mod get_stake_info;
pub mod initialize_pool;
pub mod stake;
pub mod unstake;
pub mod withdraw_all;

pub use fund_rewards::*;
pub use get_rewards::*;
pub use get_stake_info::*;
pub use initialize_pool::*;
pub use stake::*;
pub use unstake::*;
pub use withdraw_all::*;
