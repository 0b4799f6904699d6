use crate::{
    constants::*, error::ErrorCode, events::RewardsFunded, state::*, transfer::VaultTransfer,
};
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
pub struct FundRewards<'info> {
    #[account(mut)]
    pub funder: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKE_POOL_SEED.as_bytes(), stake_pool.mint.as_ref()],
        bump = stake_pool.bump,
        has_one = mint @ ErrorCode::InvalidMint,
        has_one = vault
    )]
    pub stake_pool: Account<'info, StakePool>,

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
        constraint = funder_token.mint == stake_pool.mint @ ErrorCode::InvalidMint,
        constraint = funder_token.owner == funder.key() @ ErrorCode::UnauthorizedUser
    )]
    pub funder_token: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> FundRewards<'info> {
    pub fn fund_rewards(&mut self, amount: u64) -> Result<()> {
        let pool_key = self.stake_pool.key();
        let funder = self.funder.key();

        let mut port = VaultTransfer::new(
            &self.token_program,
            &self.mint,
            &self.vault,
            &self.vault_authority,
            self.stake_pool.vault_authority_bump,
            pool_key,
            &self.funder,
            &self.funder_token,
        );
        let reward_reserve = self.stake_pool.fund_rewards(&mut port, &funder, amount)?;

        msg!(
            "Funder {} added {} tokens to the reward reserve (reserve: {})",
            funder,
            amount,
            reward_reserve
        );

        emit!(RewardsFunded {
            pool: pool_key,
            funder,
            amount,
            reward_reserve,
        });

        Ok(())
    }
}
