use crate::{constants::*, state::*};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct GetStakeInfo<'info> {
    /// CHECK: Wallet whose positions are listed; only used to derive the ledger address
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

impl<'info> GetStakeInfo<'info> {
    /// Every position in deposit order, released ones included.
    pub fn get_stake_info(&self) -> Result<Vec<StakePosition>> {
        let positions = match &self.staker_ledger {
            Some(ledger) => ledger.positions().to_vec(),
            None => Vec::new(),
        };

        msg!(
            "User {} has {} positions ({} active)",
            self.owner.key(),
            positions.len(),
            positions.iter().filter(|p| p.is_active()).count()
        );

        Ok(positions)
    }
}
