use anchor_lang::prelude::*;

use crate::constants::{LEDGER_SEED, REGISTRY_SEED};
use crate::state::{HolderLedger, Registry, UnlockedQuote};

pub fn query_unlocked(ctx: Context<QueryUnlocked>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let quote = ctx.accounts.ledger.quote(now)?;

    emit!(UnlockedQuoted { at: now, quote });

    Ok(())
}

#[derive(Accounts)]
pub struct QueryUnlocked<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        seeds = [LEDGER_SEED, registry.key().as_ref(), ledger.owner.as_ref()],
        bump = ledger.bump,
    )]
    pub ledger: Account<'info, HolderLedger>,
}

#[event]
pub struct UnlockedQuoted {
    pub at: i64,
    pub quote: UnlockedQuote,
}
