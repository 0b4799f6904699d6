use anchor_lang::prelude::*;

// Pool seeds
#[constant]
pub const STAKE_POOL_SEED: &str = "stake_pool";
pub const VAULT_SEED: &str = "vault";
pub const VAULT_AUTHORITY_SEED: &str = "vault_authority";

// Staker related seeds
#[constant]
pub const STAKER_LEDGER_SEED: &str = "staker_ledger";

// Ledger capacity, bounded so the full positions view fits in return data
pub const MAX_POSITIONS: usize = 42;

// Time
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY; // 31_536_000

// Lock configuration
#[constant]
pub const DEFAULT_LOCK_DURATION: u64 = 30 * SECONDS_PER_DAY;
pub const MAX_LOCK_DURATION: u64 = 4 * SECONDS_PER_YEAR;

// Reward configuration
pub const BPS_DENOMINATOR: u64 = 10_000;
#[constant]
pub const DEFAULT_REWARD_RATE_BPS: u16 = 1_000; // 10% per year
pub const MAX_REWARD_RATE_BPS: u16 = 10_000; // 100% per year
