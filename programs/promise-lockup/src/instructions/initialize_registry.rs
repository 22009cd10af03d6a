use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{REGISTRY_SEED, RESERVE_SEED};
use crate::error::LockupError;
use crate::state::{Registry, RegistryConfig};

pub fn initialize_registry(ctx: Context<InitializeRegistry>, config: RegistryConfig) -> Result<()> {
    let regulator = ctx.accounts.regulator.key();
    require!(regulator != Pubkey::default(), LockupError::InvalidConfig);
    require_keys_eq!(
        ctx.accounts.reserve_vault.mint,
        ctx.accounts.underlying_mint.key(),
        LockupError::InvalidTokenMint
    );

    let registry = Registry::new(
        regulator,
        ctx.accounts.underlying_mint.key(),
        ctx.accounts.reserve_vault.key(),
        ctx.bumps.registry,
        config,
    )?;
    ctx.accounts.registry.set_inner(registry);

    let reg = &ctx.accounts.registry;
    msg!(
        "registry {} sale [{}, {}) tiers={}",
        reg.metadata.symbol,
        reg.sale.start,
        reg.sale.end,
        reg.sale.tiers.len()
    );

    emit!(RegistryInitialized {
        regulator,
        underlying_mint: reg.underlying_mint,
        reserve_vault: reg.reserve_vault,
        sale_start: reg.sale.start,
        sale_end: reg.sale.end,
        available_for_sale: reg.sale.available_for_sale,
        max_lock_months: reg.schedule.max_lock_months,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    #[account(
        init,
        payer = regulator,
        space = 8 + Registry::SIZE,
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        init,
        payer = regulator,
        token::mint = underlying_mint,
        token::authority = registry,
        seeds = [RESERVE_SEED, registry.key().as_ref()],
        bump
    )]
    pub reserve_vault: Account<'info, TokenAccount>,

    pub underlying_mint: Account<'info, Mint>,

    #[account(mut)]
    pub regulator: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct RegistryInitialized {
    pub regulator: Pubkey,
    pub underlying_mint: Pubkey,
    pub reserve_vault: Pubkey,
    pub sale_start: i64,
    pub sale_end: i64,
    pub available_for_sale: u64,
    pub max_lock_months: u8,
}
