//! Program-wide constants and bounds.

/// Max lock records a single holder ledger can carry.
pub const MAX_LOCK_RECORDS: usize = 16;

/// Max price tiers configured for the sale.
pub const MAX_PRICE_TIERS: usize = 8;

/// Upper bound for any configured lock period, in months.
pub const MAX_LOCK_MONTHS_CEILING: u8 = 15;

/// Seconds in one lock month (31 days, no calendar arithmetic).
pub const SECONDS_PER_MONTH: i64 = 31 * 86_400;

/// Fixed-point scale of tier prices: payment per whole token, 9 decimals.
pub const PRICE_SCALE: u64 = 1_000_000_000;

pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_URI_LEN: usize = 200;

pub const REGISTRY_SEED: &[u8] = b"registry";
pub const RESERVE_SEED: &[u8] = b"reserve";
pub const LEDGER_SEED: &[u8] = b"ledger";
