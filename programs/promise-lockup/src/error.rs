use anchor_lang::prelude::*;

/// Error codes for the promise lockup program.
#[error_code]
pub enum LockupError {
    #[msg("Requested amount exceeds the unlocked balance")]
    InsufficientUnlocked,

    #[msg("Requested amount exceeds the wrapped balance")]
    InsufficientBalance,

    #[msg("Underlying reserve cannot cover the request")]
    InsufficientUnderlyingReserve,

    #[msg("Sale has not started")]
    SaleNotStarted,

    #[msg("Sale has ended")]
    SaleEnded,

    #[msg("Purchase below minimum amount")]
    BelowMinimum,

    #[msg("Purchase above maximum amount")]
    AboveMaximum,

    #[msg("Not enough tokens left for sale")]
    SoldOut,

    #[msg("No price tier for the requested lock period")]
    UnknownTier,

    #[msg("Lock period exceeds the configured maximum")]
    LockDurationExceeded,

    #[msg("Malformed request")]
    MalformedRequest,

    #[msg("Caller is not authorized for this operation")]
    Unauthorized,

    #[msg("Invalid configuration")]
    InvalidConfig,

    #[msg("Invalid timestamp")]
    InvalidTimestamp,

    #[msg("Holder ledger has no free lock slots")]
    LockSlotsFull,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Math overflow")]
    MathOverflow,
}
