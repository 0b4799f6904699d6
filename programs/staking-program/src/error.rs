use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    // Validation errors
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Position index does not exist for this staker")]
    InvalidIndex,
    #[msg("Reward rate exceeds the allowed maximum")]
    InvalidRewardRate,
    #[msg("Lock duration exceeds the allowed maximum")]
    InvalidLockDuration,
    #[msg("Token account mint does not match the pool mint")]
    InvalidMint,

    // Authorization errors
    #[msg("Unauthorized user")]
    UnauthorizedUser,

    // Transfer errors
    #[msg("Token transfer failed (insufficient balance or missing authorization)")]
    TransferFailed,

    // Position lifecycle errors
    #[msg("Position is still within its lock duration")]
    StillLocked,
    #[msg("Position has already been released")]
    AlreadyReleased,
    #[msg("Staker ledger has no room for another position")]
    PositionLimitReached,
    #[msg("No unlocked position is available to withdraw")]
    NothingToWithdraw,

    // Reward errors
    #[msg("Reward reserve cannot cover the accrued rewards")]
    InsufficientRewardReserve,

    // Math errors
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    #[msg("Arithmetic underflow")]
    ArithmeticUnderflow,
}
