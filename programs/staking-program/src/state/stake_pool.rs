use crate::{
    constants::{MAX_LOCK_DURATION, MAX_REWARD_RATE_BPS},
    error::ErrorCode,
    policy::{LockPolicy, RewardAccrualPolicy},
    state::Settlement,
    transfer::AssetTransferPort,
};
use anchor_lang::prelude::*;

/// Per-mint staking configuration and custody bookkeeping.
///
/// The vault holds every staked principal plus the reward reserve, so
/// `vault balance >= total_staked + reward_reserve` holds as long as tokens
/// only enter and leave the vault through this program.
#[account]
#[derive(InitSpace, Default, Debug, PartialEq, Eq)]
pub struct StakePool {
    pub authority: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub reward_rate_bps: u16, // Basis points per year (1000 = 10%)
    pub lock_duration: u64,   // Seconds
    pub total_staked: u64,
    pub reward_reserve: u64,
    pub total_rewards_paid: u64,
    pub created_at: i64,
    pub bump: u8,
    pub vault_authority_bump: u8,
}

/// Pool counters after a settlement, computed before any tokens move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PoolTotals {
    total_staked: u64,
    reward_reserve: u64,
    total_rewards_paid: u64,
}

impl StakePool {
    pub fn validate_terms(reward_rate_bps: u16, lock_duration: u64) -> Result<()> {
        require!(
            reward_rate_bps <= MAX_REWARD_RATE_BPS,
            ErrorCode::InvalidRewardRate
        );
        require!(
            lock_duration <= MAX_LOCK_DURATION,
            ErrorCode::InvalidLockDuration
        );
        Ok(())
    }

    pub fn accrual_policy(&self) -> RewardAccrualPolicy {
        RewardAccrualPolicy::new(self.reward_rate_bps)
    }

    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy::new(self.lock_duration)
    }

    /// Moves `amount` from `funder` into the vault and earmarks it for rewards.
    /// Returns the new reserve.
    pub fn fund_rewards<P: AssetTransferPort>(
        &mut self,
        port: &mut P,
        funder: &Pubkey,
        amount: u64,
    ) -> Result<u64> {
        require!(amount > 0, ErrorCode::ZeroAmount);
        let reward_reserve = self
            .reward_reserve
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticOverflow)?;

        port.transfer_in(funder, amount)?;

        self.reward_reserve = reward_reserve;
        Ok(reward_reserve)
    }

    pub(crate) fn staked_after_deposit(&self, amount: u64) -> Result<u64> {
        Ok(self
            .total_staked
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticOverflow)?)
    }

    pub(crate) fn totals_after_settlement(&self, settlement: &Settlement) -> Result<PoolTotals> {
        if settlement.reward > self.reward_reserve {
            msg!(
                "Reward {} exceeds reserve {}",
                settlement.reward,
                self.reward_reserve
            );
            return err!(ErrorCode::InsufficientRewardReserve);
        }

        Ok(PoolTotals {
            total_staked: self
                .total_staked
                .checked_sub(settlement.principal)
                .ok_or(ErrorCode::ArithmeticUnderflow)?,
            reward_reserve: self.reward_reserve - settlement.reward,
            total_rewards_paid: self
                .total_rewards_paid
                .checked_add(settlement.reward)
                .ok_or(ErrorCode::ArithmeticOverflow)?,
        })
    }

    pub(crate) fn apply_totals(&mut self, totals: PoolTotals) {
        self.total_staked = totals.total_staked;
        self.reward_reserve = totals.reward_reserve;
        self.total_rewards_paid = totals.total_rewards_paid;
    }
}
