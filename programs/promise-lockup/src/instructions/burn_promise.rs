use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{LEDGER_SEED, REGISTRY_SEED, RESERVE_SEED};
use crate::engine::{gateway, Effect};
use crate::error::LockupError;
use crate::state::{HolderLedger, Registry};

/// Burn unlocked promise value and pay the same amount of underlying to the
/// owner of `recipient_token_account`.
pub fn burn_promise(ctx: Context<BurnPromise>, amount: u64) -> Result<()> {
    // Capture before the mutable borrows below.
    let registry_ai = ctx.accounts.registry.to_account_info();
    let registry_bump = ctx.accounts.registry.bump;

    let reg = &ctx.accounts.registry;
    require_keys_eq!(
        ctx.accounts.recipient_token_account.mint,
        reg.underlying_mint,
        LockupError::InvalidTokenMint
    );
    require!(
        ctx.accounts.reserve_vault.amount >= amount,
        LockupError::InsufficientUnderlyingReserve
    );

    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();
    let recipient = ctx.accounts.recipient_token_account.owner;

    let redemption = gateway::burn(
        &owner,
        &mut ctx.accounts.registry,
        &mut ctx.accounts.ledger,
        amount,
        recipient,
        now,
    )?;

    release_from_reserve(
        &ctx.accounts.token_program,
        &ctx.accounts.reserve_vault,
        &ctx.accounts.recipient_token_account,
        registry_ai,
        registry_bump,
        redemption.effect,
    )?;

    emit!(PromiseBurned {
        holder: owner,
        recipient,
        amount,
        from_pool: redemption.withdrawal.from_pool,
        total_supply: ctx.accounts.registry.total_supply,
        available_reserve: ctx.accounts.registry.available_reserve,
    });

    Ok(())
}

/// Execute a `ReleaseUnderlying` effect: vault to `destination`, signed by the
/// registry PDA.
pub(crate) fn release_from_reserve<'info>(
    token_program: &Program<'info, Token>,
    reserve_vault: &Account<'info, TokenAccount>,
    destination: &Account<'info, TokenAccount>,
    registry_ai: AccountInfo<'info>,
    registry_bump: u8,
    effect: Effect,
) -> Result<()> {
    let Effect::ReleaseUnderlying { recipient, amount } = effect else {
        return err!(LockupError::MalformedRequest);
    };
    require_keys_eq!(destination.owner, recipient, LockupError::InvalidTokenAccount);

    let signer_seeds: &[&[&[u8]]] = &[&[REGISTRY_SEED, &[registry_bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            Transfer {
                from: reserve_vault.to_account_info(),
                to: destination.to_account_info(),
                authority: registry_ai,
            },
            signer_seeds,
        ),
        amount,
    )
}

#[derive(Accounts)]
pub struct BurnPromise<'info> {
    #[account(mut, seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        mut,
        seeds = [LEDGER_SEED, registry.key().as_ref(), owner.key().as_ref()],
        bump = ledger.bump,
    )]
    pub ledger: Account<'info, HolderLedger>,

    #[account(
        mut,
        seeds = [RESERVE_SEED, registry.key().as_ref()],
        bump,
        constraint = reserve_vault.key() == registry.reserve_vault @ LockupError::InvalidTokenAccount,
    )]
    pub reserve_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub recipient_token_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct PromiseBurned {
    pub holder: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
    pub from_pool: u64,
    pub total_supply: u64,
    pub available_reserve: u64,
}
