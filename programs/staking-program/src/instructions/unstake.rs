use crate::{
    constants::*, error::ErrorCode, events::PositionReleased, state::*, transfer::VaultTransfer,
};
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
pub struct Unstake<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKE_POOL_SEED.as_bytes(), stake_pool.mint.as_ref()],
        bump = stake_pool.bump,
        has_one = mint @ ErrorCode::InvalidMint,
        has_one = vault
    )]
    pub stake_pool: Account<'info, StakePool>,

    #[account(
        mut,
        seeds = [
            STAKER_LEDGER_SEED.as_bytes(),
            stake_pool.key().as_ref(),
            staker.key().as_ref(),
        ],
        bump = staker_ledger.bump,
        constraint = staker_ledger.owner == staker.key() @ ErrorCode::UnauthorizedUser
    )]
    pub staker_ledger: Account<'info, StakerLedger>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub vault: Account<'info, TokenAccount>,

    /// CHECK: Vault authority PDA, signs the payout
    #[account(
        seeds = [VAULT_AUTHORITY_SEED.as_bytes(), stake_pool.key().as_ref()],
        bump = stake_pool.vault_authority_bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = staker_token.mint == stake_pool.mint @ ErrorCode::InvalidMint,
        constraint = staker_token.owner == staker.key() @ ErrorCode::UnauthorizedUser
    )]
    pub staker_token: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Unstake<'info> {
    pub fn unstake(&mut self, index: u32) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;
        let pool_key = self.stake_pool.key();

        let mut port = VaultTransfer::new(
            &self.token_program,
            &self.mint,
            &self.vault,
            &self.vault_authority,
            self.stake_pool.vault_authority_bump,
            pool_key,
            &self.staker,
            &self.staker_token,
        );
        let settlement = self
            .staker_ledger
            .release(&mut port, &mut self.stake_pool, index, now)?;
        let payout = settlement.payout()?;

        msg!(
            "User {} released position {}: {} principal + {} reward",
            self.staker.key(),
            index,
            settlement.principal,
            settlement.reward
        );

        emit!(PositionReleased {
            pool: pool_key,
            owner: self.staker.key(),
            index,
            principal: settlement.principal,
            reward: settlement.reward,
            timestamp: now,
        });

        Ok(payout)
    }
}
