use anchor_lang::prelude::*;

use crate::constants::REGISTRY_SEED;
use crate::state::{Registry, RegistrySnapshot};

pub fn query_registry(ctx: Context<QueryRegistry>) -> Result<()> {
    emit!(RegistrySnapshotted {
        snapshot: ctx.accounts.registry.snapshot(),
    });
    Ok(())
}

#[derive(Accounts)]
pub struct QueryRegistry<'info> {
    #[account(seeds = [REGISTRY_SEED], bump = registry.bump)]
    pub registry: Box<Account<'info, Registry>>,
}

#[event]
pub struct RegistrySnapshotted {
    pub snapshot: RegistrySnapshot,
}
