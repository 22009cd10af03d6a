use anchor_lang::prelude::*;

use crate::constants::{LEDGER_SEED, REGISTRY_SEED};
use crate::engine::gateway;
use crate::state::{HolderLedger, LockWindow, Registry};

/// Move unlocked promise value between ledgers. With `relock` the receiver
/// gets a new lock record for the whole amount instead of free balance.
pub fn transfer_promise(
    ctx: Context<TransferPromise>,
    amount: u64,
    relock: Option<LockWindow>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    let receipt = gateway::transfer(
        &owner,
        &ctx.accounts.registry,
        &mut ctx.accounts.from_ledger,
        &mut ctx.accounts.to_ledger,
        amount,
        relock,
        now,
    )?;

    emit!(PromiseTransferred {
        from: owner,
        to: ctx.accounts.to_ledger.owner,
        amount,
        from_pool: receipt.withdrawal.from_pool,
        records_touched: receipt.withdrawal.touched.len() as u8,
        relocked: receipt.relocked,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct TransferPromise<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        mut,
        seeds = [LEDGER_SEED, registry.key().as_ref(), owner.key().as_ref()],
        bump = from_ledger.bump,
    )]
    pub from_ledger: Account<'info, HolderLedger>,

    #[account(
        mut,
        seeds = [LEDGER_SEED, registry.key().as_ref(), to_ledger.owner.as_ref()],
        bump = to_ledger.bump,
    )]
    pub to_ledger: Account<'info, HolderLedger>,

    pub owner: Signer<'info>,
}

#[event]
pub struct PromiseTransferred {
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u64,
    pub from_pool: u64,
    pub records_touched: u8,
    pub relocked: Option<LockWindow>,
}
