use anchor_lang::prelude::*;

use crate::constants::{LEDGER_SEED, MAX_LOCK_RECORDS};
use crate::error::LockupError;
use crate::state::{LockRecord, LockWindow};
use crate::utils::vesting;

/// Per-holder promise ledger PDA.
///
/// `balance` always equals `released_pool` plus the outstanding principal of
/// every record. Records are kept in creation order; withdrawals drain the
/// free pool first and then the oldest record.
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HolderLedger {
    pub owner: Pubkey,
    pub registry: Pubkey,
    pub bump: u8,
    /// Nominal wrapped balance.
    pub balance: u64,
    /// Lock-free value (received by plain transfers).
    pub released_pool: u64,
    /// Last instant value left this ledger; 0 if never.
    pub last_received: i64,
    pub records: Vec<LockRecord>,
}

impl HolderLedger {
    pub const SIZE: usize =
        32 + // owner
        32 + // registry
        1 +  // bump
        8 +  // balance
        8 +  // released_pool
        8 +  // last_received
        4 + LockRecord::SIZE * MAX_LOCK_RECORDS; // records

    pub fn address(registry: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[LEDGER_SEED, registry.as_ref(), owner.as_ref()],
            &crate::ID,
        )
    }

    pub fn new(owner: Pubkey, registry: Pubkey, bump: u8) -> Self {
        Self {
            owner,
            registry,
            bump,
            ..Default::default()
        }
    }

    /// Sum of principal ever committed to the live records.
    pub fn total_locked(&self) -> std::result::Result<u64, LockupError> {
        self.records.iter().try_fold(0u64, |acc, r| {
            acc.checked_add(r.locked_amount)
                .ok_or(LockupError::MathOverflow)
        })
    }

    /// Principal still held in records.
    pub fn outstanding_locked(&self) -> std::result::Result<u64, LockupError> {
        self.records.iter().try_fold(0u64, |acc, r| {
            acc.checked_add(r.outstanding())
                .ok_or(LockupError::MathOverflow)
        })
    }

    /// Value that could leave the ledger at `now`.
    pub fn movable(&self, now: i64) -> std::result::Result<u64, LockupError> {
        self.records.iter().try_fold(self.released_pool, |acc, r| {
            acc.checked_add(vesting::available(r, now)?)
                .ok_or(LockupError::MathOverflow)
        })
    }

    pub fn is_consistent(&self) -> bool {
        let records_ok = self
            .records
            .iter()
            .all(|r| r.released_amount < r.locked_amount && r.start_unlock <= r.end_unlock);
        let sum = self
            .outstanding_locked()
            .ok()
            .and_then(|locked| locked.checked_add(self.released_pool));
        records_ok && sum == Some(self.balance)
    }

    /// Append a new tranche after every existing one.
    pub fn grant_lock(
        &mut self,
        locked_amount: u64,
        window: LockWindow,
    ) -> std::result::Result<(), LockupError> {
        if self.records.len() >= MAX_LOCK_RECORDS {
            return Err(LockupError::LockSlotsFull);
        }
        let record = LockRecord::new(locked_amount, window)?;
        let balance = self
            .balance
            .checked_add(locked_amount)
            .ok_or(LockupError::MathOverflow)?;
        self.records.push(record);
        self.balance = balance;
        Ok(())
    }

    /// Lock-free credit.
    pub fn credit_free(&mut self, amount: u64) -> std::result::Result<(), LockupError> {
        let released_pool = self
            .released_pool
            .checked_add(amount)
            .ok_or(LockupError::MathOverflow)?;
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(LockupError::MathOverflow)?;
        self.released_pool = released_pool;
        self.balance = balance;
        Ok(())
    }

    /// Take up to `requested` of movable value, free pool first, then records
    /// oldest-first. Returns less than requested on shortfall; the ledger is
    /// still mutated for what was granted, so callers stage on a copy.
    pub fn withdraw_up_to(
        &mut self,
        requested: u64,
        now: i64,
    ) -> std::result::Result<Withdrawal, LockupError> {
        let from_pool = self.released_pool.min(requested);
        self.released_pool -= from_pool;
        let mut remaining = requested - from_pool;
        let mut touched = Vec::new();

        for record in self.records.iter_mut() {
            if remaining == 0 {
                break;
            }
            let take = vesting::available(record, now)?.min(remaining);
            if take == 0 {
                continue;
            }
            record.released_amount = record
                .released_amount
                .checked_add(take)
                .ok_or(LockupError::MathOverflow)?;
            record.last_received = now;
            remaining -= take;
            touched.push(TouchedRecord {
                start_unlock: record.start_unlock,
                end_unlock: record.end_unlock,
                taken: take,
                exhausted: record.is_exhausted(),
            });
        }
        self.records.retain(|r| !r.is_exhausted());

        let granted = requested - remaining;
        self.balance = self
            .balance
            .checked_sub(granted)
            .ok_or(LockupError::MathOverflow)?;
        if granted > 0 {
            self.last_received = now;
        }

        Ok(Withdrawal {
            granted,
            from_pool,
            touched,
        })
    }

    pub fn quote(&self, now: i64) -> std::result::Result<UnlockedQuote, LockupError> {
        let mut records = Vec::with_capacity(self.records.len());
        for r in &self.records {
            records.push(RecordQuote {
                start_unlock: r.start_unlock,
                end_unlock: r.end_unlock,
                last_received: r.last_received,
                locked_amount: r.locked_amount,
                released_amount: r.released_amount,
                unlocked_amount: vesting::unlocked(r, now)?,
                available: vesting::available(r, now)?,
            });
        }
        Ok(UnlockedQuote {
            owner: self.owner,
            records,
            unlocked_total: self.movable(now)?,
            locked_total: self.outstanding_locked()?,
            principal_total: self.total_locked()?,
            free_pool: self.released_pool,
            balance: self.balance,
            last_received: self.last_received,
        })
    }
}

/// Outcome of `HolderLedger::withdraw_up_to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Withdrawal {
    pub granted: u64,
    pub from_pool: u64,
    pub touched: Vec<TouchedRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchedRecord {
    pub start_unlock: i64,
    pub end_unlock: i64,
    pub taken: u64,
    pub exhausted: bool,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordQuote {
    pub start_unlock: i64,
    pub end_unlock: i64,
    pub last_received: i64,
    pub locked_amount: u64,
    pub released_amount: u64,
    /// Vested so far, including what was already taken.
    pub unlocked_amount: u64,
    /// Vested and not yet taken.
    pub available: u64,
}

/// Per-record unlock breakdown of one holder.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UnlockedQuote {
    pub owner: Pubkey,
    pub records: Vec<RecordQuote>,
    /// Free pool plus every record's available value.
    pub unlocked_total: u64,
    /// Principal still held in records.
    pub locked_total: u64,
    /// Principal ever committed to the live records, taken or not.
    pub principal_total: u64,
    pub free_pool: u64,
    pub balance: u64,
    pub last_received: i64,
}
