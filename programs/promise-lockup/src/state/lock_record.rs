use anchor_lang::prelude::*;

use crate::error::LockupError;

/// One vesting tranche held by a ledger.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LockRecord {
    /// Unlock curve begins (nothing unlocked before this instant).
    pub start_unlock: i64,
    /// Unlock curve completes (fully unlocked at and after this instant).
    pub end_unlock: i64,
    /// Last instant value was taken from this record; 0 if untouched.
    pub last_received: i64,
    /// Principal committed to the tranche. Never changes.
    pub locked_amount: u64,
    /// Cumulative amount taken out; never exceeds `locked_amount`.
    pub released_amount: u64,
}

impl LockRecord {
    pub const SIZE: usize =
        8 + // start_unlock
        8 + // end_unlock
        8 + // last_received
        8 + // locked_amount
        8;  // released_amount

    pub fn new(locked_amount: u64, window: LockWindow) -> std::result::Result<Self, LockupError> {
        if locked_amount == 0 {
            return Err(LockupError::MalformedRequest);
        }
        window.validate()?;
        Ok(Self {
            start_unlock: window.start_unlock,
            end_unlock: window.end_unlock,
            last_received: 0,
            locked_amount,
            released_amount: 0,
        })
    }

    /// Principal still owed by this tranche.
    pub fn outstanding(&self) -> u64 {
        self.locked_amount.saturating_sub(self.released_amount)
    }

    pub fn is_exhausted(&self) -> bool {
        self.released_amount >= self.locked_amount
    }

    pub fn window(&self) -> LockWindow {
        LockWindow {
            start_unlock: self.start_unlock,
            end_unlock: self.end_unlock,
        }
    }
}

/// Absolute unlock window of a tranche.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockWindow {
    pub start_unlock: i64,
    pub end_unlock: i64,
}

impl LockWindow {
    pub fn validate(&self) -> std::result::Result<(), LockupError> {
        if self.start_unlock < 0 || self.end_unlock < self.start_unlock {
            return Err(LockupError::MalformedRequest);
        }
        Ok(())
    }
}
