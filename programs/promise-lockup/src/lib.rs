use anchor_lang::prelude::*;

pub mod constants;
pub mod engine;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
use state::{LockWindow, RegistryConfig};

declare_id!("61EiRiRNSU4ZEhnn8JpC6L9VRHz6oKvD9YzSP6bNZNWp");

#[program]
pub mod promise_lockup {
    use super::*;

    pub fn initialize_registry(ctx: Context<InitializeRegistry>, config: RegistryConfig) -> Result<()> {
        instructions::initialize_registry::initialize_registry(ctx, config)
    }

    pub fn open_ledger(ctx: Context<OpenLedger>, owner: Pubkey) -> Result<()> {
        instructions::open_ledger::open_ledger(ctx, owner)
    }

    pub fn grant_lock(ctx: Context<GrantLock>, principal: u64, lock_months: u8) -> Result<()> {
        instructions::grant_lock::grant_lock(ctx, principal, lock_months)
    }

    pub fn purchase(ctx: Context<Purchase>, payment: u64, lock_months: u8) -> Result<()> {
        instructions::purchase::purchase(ctx, payment, lock_months)
    }

    pub fn transfer_promise(
        ctx: Context<TransferPromise>,
        amount: u64,
        relock: Option<LockWindow>,
    ) -> Result<()> {
        instructions::transfer_promise::transfer_promise(ctx, amount, relock)
    }

    pub fn burn_promise(ctx: Context<BurnPromise>, amount: u64) -> Result<()> {
        instructions::burn_promise::burn_promise(ctx, amount)
    }

    pub fn swap_to_underlying(ctx: Context<SwapToUnderlying>, amount: u64) -> Result<()> {
        instructions::swap_to_underlying::swap_to_underlying(ctx, amount)
    }

    pub fn top_up_reserve(ctx: Context<TopUpReserve>, amount: u64) -> Result<()> {
        instructions::top_up_reserve::top_up_reserve(ctx, amount)
    }

    pub fn query_unlocked(ctx: Context<QueryUnlocked>) -> Result<()> {
        instructions::query_unlocked::query_unlocked(ctx)
    }

    pub fn query_registry(ctx: Context<QueryRegistry>) -> Result<()> {
        instructions::query_registry::query_registry(ctx)
    }
}
