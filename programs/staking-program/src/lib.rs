pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod policy;
pub mod state;
pub mod transfer;

use anchor_lang::prelude::*;

pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("FPM2uevM6cuCvDBtpPPLAwHZVqm9LhaPejao4jq9ocnM");

#[program]
pub mod staking_program {
    use super::*;

    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        reward_rate_bps: u16, // Annual reward rate in basis points (e.g., 1000 = 10%)
        lock_duration: u64,   // Seconds a position stays locked after deposit
    ) -> Result<()> {
        ctx.accounts
            .initialize_pool(reward_rate_bps, lock_duration, &ctx.bumps)
    }

    pub fn fund_rewards(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
        ctx.accounts.fund_rewards(amount)
    }

    pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<u32> {
        ctx.accounts.stake(amount, &ctx.bumps)
    }

    pub fn unstake(ctx: Context<Unstake>, index: u32) -> Result<u64> {
        ctx.accounts.unstake(index)
    }

    pub fn withdraw_all(ctx: Context<WithdrawAll>) -> Result<u64> {
        ctx.accounts.withdraw_all()
    }

    pub fn get_stake_info(ctx: Context<GetStakeInfo>) -> Result<Vec<StakePosition>> {
        ctx.accounts.get_stake_info()
    }

    pub fn get_rewards(ctx: Context<GetRewards>) -> Result<u64> {
        ctx.accounts.get_rewards()
    }
}
