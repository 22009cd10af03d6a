//! Lock-period arithmetic. A lock month is a fixed span of seconds
//! (`ScheduleConfig::month_seconds`, 31 days unless configured otherwise):
//! - start_unlock = now + lock_months * month_seconds
//! - end_unlock   = start_unlock + vesting_period

use crate::error::LockupError;
use crate::state::{LockWindow, ScheduleConfig};

pub fn lock_window(
    now: i64,
    lock_months: u8,
    schedule: &ScheduleConfig,
) -> Result<LockWindow, LockupError> {
    if now < 0 {
        return Err(LockupError::InvalidTimestamp);
    }
    let lock_span = schedule
        .month_seconds
        .checked_mul(lock_months as i64)
        .ok_or(LockupError::MathOverflow)?;
    let start_unlock = now
        .checked_add(lock_span)
        .ok_or(LockupError::MathOverflow)?;
    let end_unlock = start_unlock
        .checked_add(schedule.vesting_period)
        .ok_or(LockupError::MathOverflow)?;
    Ok(LockWindow {
        start_unlock,
        end_unlock,
    })
}

/// Latest `end_unlock` a tranche created at `now` may carry.
pub fn max_lock_end(now: i64, schedule: &ScheduleConfig) -> Result<i64, LockupError> {
    Ok(lock_window(now, schedule.max_lock_months, schedule)?.end_unlock)
}

/// Explicit windows supplied by a caller (re-locking transfers).
pub fn check_explicit_window(
    window: &LockWindow,
    now: i64,
    schedule: &ScheduleConfig,
) -> Result<(), LockupError> {
    window.validate()?;
    if window.end_unlock > max_lock_end(now, schedule)? {
        return Err(LockupError::LockDurationExceeded);
    }
    Ok(())
}
