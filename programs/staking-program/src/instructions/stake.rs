use crate::{
    constants::*, error::ErrorCode, events::StakeDeposited, state::*, transfer::VaultTransfer,
};
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
pub struct Stake<'info> {
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
        init_if_needed,
        payer = staker,
        space = 8 + StakerLedger::INIT_SPACE,
        seeds = [
            STAKER_LEDGER_SEED.as_bytes(),
            stake_pool.key().as_ref(),
            staker.key().as_ref(),
        ],
        bump
    )]
    pub staker_ledger: Account<'info, StakerLedger>,

    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub vault: Account<'info, TokenAccount>,

    /// CHECK: Vault authority PDA, only passed through to the token program
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
    pub system_program: Program<'info, System>,
}

impl<'info> Stake<'info> {
    pub fn stake(&mut self, amount: u64, bumps: &StakeBumps) -> Result<u32> {
        let now = Clock::get()?.unix_timestamp;
        let pool_key = self.stake_pool.key();

        // First stake in this pool creates the ledger
        if self.staker_ledger.owner == Pubkey::default() {
            self.staker_ledger.set_inner(StakerLedger::new(
                self.staker.key(),
                pool_key,
                bumps.staker_ledger,
            ));
        }
        require_keys_eq!(
            self.staker_ledger.owner,
            self.staker.key(),
            ErrorCode::UnauthorizedUser
        );

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
        let index = self
            .staker_ledger
            .deposit(&mut port, &mut self.stake_pool, amount, now)?;

        msg!(
            "User {} staked {} tokens as position {} (pool total: {})",
            self.staker.key(),
            amount,
            index,
            self.stake_pool.total_staked
        );

        emit!(StakeDeposited {
            pool: pool_key,
            owner: self.staker.key(),
            index,
            amount,
            timestamp: now,
        });

        Ok(index)
    }
}
