use anchor_lang::prelude::*;

#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub mint: Pubkey,
    pub authority: Pubkey,
    pub reward_rate_bps: u16,
    pub lock_duration: u64,
}

#[event]
pub struct RewardsFunded {
    pub pool: Pubkey,
    pub funder: Pubkey,
    pub amount: u64,
    pub reward_reserve: u64,
}

#[event]
pub struct StakeDeposited {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub index: u32,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct PositionReleased {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub index: u32,
    pub principal: u64,
    pub reward: u64,
    pub timestamp: i64,
}

#[event]
pub struct StakeWithdrawn {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub positions: u32,
    pub principal: u64,
    pub reward: u64,
    pub timestamp: i64,
}
