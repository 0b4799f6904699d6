use crate::{constants::*, state::*};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct GetRewards<'info> {
    /// CHECK: Wallet whose rewards are computed; only used to derive the ledger address
    pub owner: UncheckedAccount<'info>,

    #[account(
        seeds = [STAKE_POOL_SEED.as_bytes(), stake_pool.mint.as_ref()],
        bump = stake_pool.bump
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// Owner's ledger (optional - may not exist if the owner never staked)
    #[account(
        seeds = [
            STAKER_LEDGER_SEED.as_bytes(),
            stake_pool.key().as_ref(),
            owner.key().as_ref(),
        ],
        bump,
    )]
    pub staker_ledger: Option<Account<'info, StakerLedger>>,
}

impl<'info> GetRewards<'info> {
    pub fn get_rewards(&self) -> Result<u64> {
        let Some(ledger) = &self.staker_ledger else {
            msg!("User {} has no stake in this pool", self.owner.key());
            return Ok(0);
        };

        let now = Clock::get()?.unix_timestamp;
        let rewards = ledger.rewards(&self.stake_pool.accrual_policy(), now)?;

        msg!(
            "User {} has accrued {} reward tokens on {} staked",
            self.owner.key(),
            rewards,
            ledger.active_principal()
        );

        Ok(rewards)
    }
}
