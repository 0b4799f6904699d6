use crate::{constants::*, events::PoolInitialized, state::*};
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
pub struct InitializePool<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    pub mint: Account<'info, Mint>,

    #[account(
        init,
        payer = authority,
        space = 8 + StakePool::INIT_SPACE,
        seeds = [STAKE_POOL_SEED.as_bytes(), mint.key().as_ref()],
        bump
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// CHECK: PDA that signs outbound vault transfers; holds no data
    #[account(
        seeds = [VAULT_AUTHORITY_SEED.as_bytes(), stake_pool.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Custody for staked principal and the reward reserve
    #[account(
        init,
        payer = authority,
        seeds = [VAULT_SEED.as_bytes(), stake_pool.key().as_ref()],
        bump,
        token::mint = mint,
        token::authority = vault_authority,
    )]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializePool<'info> {
    pub fn initialize_pool(
        &mut self,
        reward_rate_bps: u16,
        lock_duration: u64,
        bumps: &InitializePoolBumps,
    ) -> Result<()> {
        StakePool::validate_terms(reward_rate_bps, lock_duration)?;

        let stake_pool = &mut self.stake_pool;

        stake_pool.authority = self.authority.key();
        stake_pool.mint = self.mint.key();
        stake_pool.vault = self.vault.key();

        stake_pool.reward_rate_bps = reward_rate_bps;
        stake_pool.lock_duration = lock_duration;

        // Counters start empty; rewards must be funded before they can be paid
        stake_pool.total_staked = 0;
        stake_pool.reward_reserve = 0;
        stake_pool.total_rewards_paid = 0;
        stake_pool.created_at = Clock::get()?.unix_timestamp;

        stake_pool.bump = bumps.stake_pool;
        stake_pool.vault_authority_bump = bumps.vault_authority;

        msg!(
            "Stake pool for mint {} initialized by authority: {}",
            self.mint.key(),
            self.authority.key()
        );
        msg!(
            "Reward rate: {:.2}% per year, lock duration: {} days",
            reward_rate_bps as f64 / 100.0,
            lock_duration as f64 / SECONDS_PER_DAY as f64
        );

        emit!(PoolInitialized {
            pool: stake_pool.key(),
            mint: self.mint.key(),
            authority: self.authority.key(),
            reward_rate_bps,
            lock_duration,
        });

        Ok(())
    }
}
