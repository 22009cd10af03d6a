use anchor_lang::prelude::*;

use crate::constants::{LEDGER_SEED, REGISTRY_SEED};
use crate::error::LockupError;
use crate::state::{HolderLedger, Registry};

/// Create an empty ledger for `owner`. Anyone may pay for it.
pub fn open_ledger(ctx: Context<OpenLedger>, owner: Pubkey) -> Result<()> {
    require!(owner != Pubkey::default(), LockupError::MalformedRequest);

    let registry = ctx.accounts.registry.key();
    ctx.accounts
        .ledger
        .set_inner(HolderLedger::new(owner, registry, ctx.bumps.ledger));

    emit!(LedgerOpened {
        owner,
        ledger: ctx.accounts.ledger.key(),
        payer: ctx.accounts.payer.key(),
    });

    Ok(())
}

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct OpenLedger<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        init,
        payer = payer,
        space = 8 + HolderLedger::SIZE,
        seeds = [LEDGER_SEED, registry.key().as_ref(), owner.as_ref()],
        bump
    )]
    pub ledger: Account<'info, HolderLedger>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[event]
pub struct LedgerOpened {
    pub owner: Pubkey,
    pub ledger: Pubkey,
    pub payer: Pubkey,
}
