//! Ledger engine: gateway and sale operations plus a command dispatcher that
//! applies them to an in-memory registry and ledger book.

pub mod gateway;
pub mod sale;


use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::error::LockupError;
use crate::state::{
    HolderLedger, LockWindow, Registry, RegistryConfig, RegistrySnapshot, UnlockedQuote,
};

/// Outbound value movement requested by a committed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Send underlying tokens out of the reserve.
    ReleaseUnderlying { recipient: Pubkey, amount: u64 },
    /// Forward a sale payment to the regulator.
    ForwardPayment { to: Pubkey, amount: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    GrantLock {
        holder: Pubkey,
        principal: u64,
        lock_months: u8,
    },
    Purchase {
        buyer: Pubkey,
        payment: u64,
        lock_months: u8,
    },
    Transfer {
        from: Pubkey,
        to: Pubkey,
        amount: u64,
        relock: Option<LockWindow>,
    },
    Burn {
        holder: Pubkey,
        amount: u64,
        recipient: Pubkey,
    },
    Swap {
        holder: Pubkey,
        amount: u64,
    },
    TopUpReserve {
        amount: u64,
    },
    QueryUnlocked {
        holder: Pubkey,
    },
    QueryRegistry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Effects(Vec<Effect>),
    Unlocked(UnlockedQuote),
    Registry(RegistrySnapshot),
}

/// Registry plus every holder ledger, driven one command at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Engine {
    registry_key: Pubkey,
    registry: Registry,
    ledgers: BTreeMap<Pubkey, HolderLedger>,
    last_now: i64,
}

impl Engine {
    pub fn new(
        regulator: Pubkey,
        underlying_mint: Pubkey,
        config: RegistryConfig,
    ) -> std::result::Result<Self, LockupError> {
        let (registry_key, bump) = Registry::address();
        let (reserve_vault, _) = Registry::reserve_address(&registry_key);
        let registry = Registry::new(regulator, underlying_mint, reserve_vault, bump, config)?;
        Ok(Self {
            registry_key,
            registry,
            ledgers: BTreeMap::new(),
            last_now: 0,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn ledger(&self, owner: &Pubkey) -> Option<&HolderLedger> {
        self.ledgers.get(owner)
    }

    /// Apply one command at `now`. On error nothing changes.
    pub fn apply(
        &mut self,
        caller: Pubkey,
        command: Command,
        now: i64,
    ) -> std::result::Result<Reply, LockupError> {
        if now < self.last_now {
            return Err(LockupError::InvalidTimestamp);
        }

        let reply = match command {
            Command::GrantLock {
                holder,
                principal,
                lock_months,
            } => {
                let mut ledger = self.ledger_or_open(holder);
                sale::grant_lock(&caller, &mut self.registry, &mut ledger, principal, lock_months, now)?;
                self.ledgers.insert(holder, ledger);
                Reply::Effects(Vec::new())
            }
            Command::Purchase {
                buyer,
                payment,
                lock_months,
            } => {
                let mut ledger = self.ledger_or_open(buyer);
                let receipt =
                    sale::purchase(&caller, &mut self.registry, &mut ledger, payment, lock_months, now)?;
                self.ledgers.insert(buyer, ledger);
                Reply::Effects(vec![receipt.effect])
            }
            Command::Transfer {
                from,
                to,
                amount,
                relock,
            } => {
                let mut sender = self.ledger_or_open(from);
                let mut receiver = self.ledger_or_open(to);
                gateway::transfer(&caller, &self.registry, &mut sender, &mut receiver, amount, relock, now)?;
                self.ledgers.insert(from, sender);
                self.ledgers.insert(to, receiver);
                Reply::Effects(Vec::new())
            }
            Command::Burn {
                holder,
                amount,
                recipient,
            } => {
                let mut ledger = self.ledger_or_open(holder);
                let r = gateway::burn(&caller, &mut self.registry, &mut ledger, amount, recipient, now)?;
                self.ledgers.insert(holder, ledger);
                Reply::Effects(vec![r.effect])
            }
            Command::Swap { holder, amount } => {
                let mut ledger = self.ledger_or_open(holder);
                let r = gateway::swap(&caller, &mut self.registry, &mut ledger, amount, now)?;
                self.ledgers.insert(holder, ledger);
                Reply::Effects(vec![r.effect])
            }
            Command::TopUpReserve { amount } => {
                gateway::top_up_reserve(&mut self.registry, amount)?;
                Reply::Effects(Vec::new())
            }
            Command::QueryUnlocked { holder } => {
                Reply::Unlocked(self.ledger_or_open(holder).quote(now)?)
            }
            Command::QueryRegistry => Reply::Registry(self.registry.snapshot()),
        };

        self.last_now = now;
        Ok(reply)
    }

    /// Global invariants: supply equals the sum of holder balances and the
    /// minted/redeemed counters; every ledger is internally consistent.
    pub fn check_conservation(&self) -> bool {
        let held = self
            .ledgers
            .values()
            .try_fold(0u64, |acc, l| acc.checked_add(l.balance));
        let net_minted = self
            .registry
            .minted_total
            .checked_sub(self.registry.redeemed_total);
        held == Some(self.registry.total_supply)
            && net_minted == Some(self.registry.total_supply)
            && self.ledgers.values().all(HolderLedger::is_consistent)
    }

    fn ledger_or_open(&self, owner: Pubkey) -> HolderLedger {
        match self.ledgers.get(&owner) {
            Some(ledger) => ledger.clone(),
            None => {
                let (_, bump) = HolderLedger::address(&self.registry_key, &owner);
                HolderLedger::new(owner, self.registry_key, bump)
            }
        }
    }
}
