use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Amount is zero or below the minimum")]
    InsufficientAmount,

    #[msg("Insufficient share or base asset balance")]
    InsufficientBalance,

    #[msg("Caller does not own the withdrawal request")]
    NotOwner,

    #[msg("Withdrawal request is not pending")]
    RequestNotPending,

    #[msg("Withdrawal request is not yet unlocked")]
    NotYetUnlocked,

    #[msg("Basis point value out of range")]
    RateOutOfRange,

    #[msg("Vault state invariant violation - critical accounting error")]
    InvariantViolation,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Invalid pool configuration")]
    InvalidPoolConfig,

    #[msg("Penalty is not one of the allowed tiers")]
    InvalidPenaltyTier,

    #[msg("Pool is paused")]
    PoolPaused,

    #[msg("Insufficient liquidity in custody for withdrawal")]
    InsufficientLiquidity,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Share ledger mint or burn failed")]
    ShareLedgerFailure,

    #[msg("Base asset custody transfer failed")]
    CustodyTransferFailure,

    #[msg("Fee beneficiary rejected the fee")]
    FeeForwardFailure,

    #[msg("Too many withdrawal requests for this staker")]
    TooManyRequests,

    #[msg("Too many penalty tiers")]
    TooManyPenaltyTiers,
}

pub type VaultResult<T = ()> = std::result::Result<T, VaultError>;
