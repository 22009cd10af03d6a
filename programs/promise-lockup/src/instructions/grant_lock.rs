use anchor_lang::prelude::*;

use crate::constants::{LEDGER_SEED, REGISTRY_SEED};
use crate::engine::sale;
use crate::error::LockupError;
use crate::state::{HolderLedger, Registry};

pub fn grant_lock(ctx: Context<GrantLock>, principal: u64, lock_months: u8) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let regulator = ctx.accounts.regulator.key();

    let window = sale::grant_lock(
        &regulator,
        &mut ctx.accounts.registry,
        &mut ctx.accounts.ledger,
        principal,
        lock_months,
        now,
    )?;

    emit!(LockGranted {
        holder: ctx.accounts.ledger.owner,
        principal,
        lock_months,
        start_unlock: window.start_unlock,
        end_unlock: window.end_unlock,
        total_supply: ctx.accounts.registry.total_supply,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct GrantLock<'info> {
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        has_one = regulator @ LockupError::Unauthorized,
    )]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        mut,
        seeds = [LEDGER_SEED, registry.key().as_ref(), ledger.owner.as_ref()],
        bump = ledger.bump,
    )]
    pub ledger: Account<'info, HolderLedger>,

    pub regulator: Signer<'info>,
}

#[event]
pub struct LockGranted {
    pub holder: Pubkey,
    pub principal: u64,
    pub lock_months: u8,
    pub start_unlock: i64,
    pub end_unlock: i64,
    pub total_supply: u64,
}
