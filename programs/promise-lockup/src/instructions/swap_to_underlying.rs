use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{LEDGER_SEED, REGISTRY_SEED, RESERVE_SEED};
use crate::engine::gateway;
use crate::error::LockupError;
use crate::instructions::burn_promise::release_from_reserve;
use crate::state::{HolderLedger, Registry};

pub fn swap_to_underlying(ctx: Context<SwapToUnderlying>, amount: u64) -> Result<()> {
    let registry_ai = ctx.accounts.registry.to_account_info();
    let registry_bump = ctx.accounts.registry.bump;

    let owner = ctx.accounts.owner.key();
    require_keys_eq!(
        ctx.accounts.holder_token_account.mint,
        ctx.accounts.registry.underlying_mint,
        LockupError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.holder_token_account.owner,
        owner,
        LockupError::InvalidTokenAccount
    );
    require!(
        ctx.accounts.reserve_vault.amount >= amount,
        LockupError::InsufficientUnderlyingReserve
    );

    let now = Clock::get()?.unix_timestamp;
    let redemption = gateway::swap(
        &owner,
        &mut ctx.accounts.registry,
        &mut ctx.accounts.ledger,
        amount,
        now,
    )?;

    release_from_reserve(
        &ctx.accounts.token_program,
        &ctx.accounts.reserve_vault,
        &ctx.accounts.holder_token_account,
        registry_ai,
        registry_bump,
        redemption.effect,
    )?;

    emit!(PromiseSwapped {
        holder: owner,
        amount,
        total_supply: ctx.accounts.registry.total_supply,
        available_reserve: ctx.accounts.registry.available_reserve,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SwapToUnderlying<'info> {
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
    pub holder_token_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct PromiseSwapped {
    pub holder: Pubkey,
    pub amount: u64,
    pub total_supply: u64,
    pub available_reserve: u64,
}
