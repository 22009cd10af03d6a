//! Linear unlock curve of a single lock record.
//! - before `start_unlock`: nothing
//! - at or after `end_unlock`: everything (inclusive boundary)
//! - in between: `locked * elapsed / span`, floored, no carry between calls

use crate::error::LockupError;
use crate::state::LockRecord;

pub fn unlocked(record: &LockRecord, now: i64) -> Result<u64, LockupError> {
    if now < record.start_unlock {
        return Ok(0);
    }
    if now >= record.end_unlock {
        return Ok(record.locked_amount);
    }
    let elapsed = now
        .checked_sub(record.start_unlock)
        .ok_or(LockupError::MathOverflow)? as u128;
    let span = record
        .end_unlock
        .checked_sub(record.start_unlock)
        .ok_or(LockupError::MathOverflow)? as u128;
    let v = (record.locked_amount as u128)
        .checked_mul(elapsed)
        .ok_or(LockupError::MathOverflow)?
        / span;
    u64::try_from(v).map_err(|_| LockupError::MathOverflow)
}

/// Unlocked value not yet taken out of the record.
pub fn available(record: &LockRecord, now: i64) -> Result<u64, LockupError> {
    Ok(unlocked(record, now)?.saturating_sub(record.released_amount))
}
