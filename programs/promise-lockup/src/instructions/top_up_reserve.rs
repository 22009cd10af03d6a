use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{REGISTRY_SEED, RESERVE_SEED};
use crate::engine::gateway;
use crate::error::LockupError;
use crate::state::Registry;

/// Deposit underlying tokens backing future burns and swaps. Anyone may fund.
pub fn top_up_reserve(ctx: Context<TopUpReserve>, amount: u64) -> Result<()> {
    let reg = &ctx.accounts.registry;
    require_keys_eq!(
        ctx.accounts.funder_token_account.mint,
        reg.underlying_mint,
        LockupError::InvalidTokenMint
    );
    require_keys_eq!(
        ctx.accounts.funder_token_account.owner,
        ctx.accounts.funder.key(),
        LockupError::InvalidTokenAccount
    );

    let available_reserve = gateway::top_up_reserve(&mut ctx.accounts.registry, amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.funder_token_account.to_account_info(),
                to: ctx.accounts.reserve_vault.to_account_info(),
                authority: ctx.accounts.funder.to_account_info(),
            },
        ),
        amount,
    )?;

    ctx.accounts.reserve_vault.reload()?;
    require!(
        ctx.accounts.reserve_vault.amount >= available_reserve,
        LockupError::InsufficientUnderlyingReserve
    );

    emit!(ReserveToppedUp {
        funder: ctx.accounts.funder.key(),
        amount,
        available_reserve,
        vault_balance: ctx.accounts.reserve_vault.amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct TopUpReserve<'info> {
    #[account(mut, seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Box<Account<'info, Registry>>,

    #[account(
        mut,
        seeds = [RESERVE_SEED, registry.key().as_ref()],
        bump,
        constraint = reserve_vault.mint == registry.underlying_mint @ LockupError::InvalidTokenMint,
    )]
    pub reserve_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub funder_token_account: Account<'info, TokenAccount>,

    pub funder: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct ReserveToppedUp {
    pub funder: Pubkey,
    pub amount: u64,
    pub available_reserve: u64,
    pub vault_balance: u64,
}
