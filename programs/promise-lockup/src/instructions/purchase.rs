use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

use crate::constants::{LEDGER_SEED, REGISTRY_SEED};
use crate::engine::{sale, Effect};
use crate::error::LockupError;
use crate::state::{HolderLedger, Registry};

/// Buy locked promise tokens with lamports. The payment goes straight to the
/// regulator; the purchased amount lands as a new lock record on the buyer.
pub fn purchase(ctx: Context<Purchase>, payment: u64, lock_months: u8) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let buyer = ctx.accounts.buyer.key();

    let receipt = sale::purchase(
        &buyer,
        &mut ctx.accounts.registry,
        &mut ctx.accounts.ledger,
        payment,
        lock_months,
        now,
    )?;

    let Effect::ForwardPayment { to, amount } = receipt.effect else {
        return err!(LockupError::MalformedRequest);
    };
    require_keys_eq!(to, ctx.accounts.regulator.key(), LockupError::Unauthorized);

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.buyer.to_account_info(),
                to: ctx.accounts.regulator.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(PromisePurchased {
        buyer,
        payment,
        tokens_out: receipt.tokens_out,
        lock_months,
        start_unlock: receipt.window.start_unlock,
        end_unlock: receipt.window.end_unlock,
        available_for_sale: ctx.accounts.registry.sale.available_for_sale,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Purchase<'info> {
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        has_one = regulator @ LockupError::Unauthorized,
    )]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        mut,
        seeds = [LEDGER_SEED, registry.key().as_ref(), buyer.key().as_ref()],
        bump = ledger.bump,
    )]
    pub ledger: Account<'info, HolderLedger>,

    #[account(mut)]
    pub regulator: SystemAccount<'info>,

    #[account(mut)]
    pub buyer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[event]
pub struct PromisePurchased {
    pub buyer: Pubkey,
    pub payment: u64,
    pub tokens_out: u64,
    pub lock_months: u8,
    pub start_unlock: i64,
    pub end_unlock: i64,
    pub available_for_sale: u64,
}
