use anchor_lang::prelude::*;

use crate::constants::{
    MAX_LOCK_MONTHS_CEILING, MAX_NAME_LEN, MAX_PRICE_TIERS, MAX_SYMBOL_LEN, MAX_URI_LEN,
    REGISTRY_SEED, RESERVE_SEED,
};
use crate::error::LockupError;

/// Sale price for one lock period.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceTier {
    pub lock_months: u8,
    /// Payment per whole token, scaled by `PRICE_SCALE`.
    pub price: u64,
}

impl PriceTier {
    pub const SIZE: usize = 1 + 8;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SaleConfig {
    /// Sale opens at this instant (inclusive).
    pub start: i64,
    /// Sale closes at this instant (exclusive).
    pub end: i64,
    pub tiers: Vec<PriceTier>,
    pub min_purchase: u64,
    pub max_purchase: u64,
    /// Tokens still available to buyers.
    pub available_for_sale: u64,
}

impl SaleConfig {
    pub const SIZE: usize =
        8 + // start
        8 + // end
        4 + PriceTier::SIZE * MAX_PRICE_TIERS + // tiers
        8 + // min_purchase
        8 + // max_purchase
        8;  // available_for_sale

    pub fn price_for(&self, lock_months: u8) -> Option<u64> {
        self.tiers
            .iter()
            .find(|t| t.lock_months == lock_months)
            .map(|t| t.price)
    }

    pub fn phase(&self, now: i64) -> SalePhase {
        if now < self.start {
            SalePhase::Before
        } else if now >= self.end {
            SalePhase::Closed
        } else {
            SalePhase::Open
        }
    }
}

/// Time-driven sale state; there is no explicit transition call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SalePhase {
    Before,
    Open,
    Closed,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Longest lock period accepted by grants and re-locking transfers.
    pub max_lock_months: u8,
    pub month_seconds: i64,
    /// Length of the linear unlock once a lock period has elapsed.
    pub vesting_period: i64,
}

impl ScheduleConfig {
    pub const SIZE: usize = 1 + 8 + 8;
}

/// Display metadata of the promise token.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PromiseMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl PromiseMetadata {
    pub const SIZE: usize =
        4 + MAX_NAME_LEN +
        4 + MAX_SYMBOL_LEN +
        4 + MAX_URI_LEN;
}

/// Instruction input for `initialize_registry`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    pub sale: SaleConfig,
    pub schedule: ScheduleConfig,
    pub metadata: PromiseMetadata,
}

impl RegistryConfig {
    pub fn validate(&self) -> std::result::Result<(), LockupError> {
        let sale = &self.sale;
        let schedule = &self.schedule;

        if sale.start < 0 || sale.end <= sale.start {
            return Err(LockupError::InvalidTimestamp);
        }
        if sale.min_purchase == 0 || sale.min_purchase > sale.max_purchase {
            return Err(LockupError::InvalidConfig);
        }
        if schedule.month_seconds <= 0 || schedule.vesting_period < 0 {
            return Err(LockupError::InvalidConfig);
        }
        if schedule.max_lock_months > MAX_LOCK_MONTHS_CEILING {
            return Err(LockupError::LockDurationExceeded);
        }

        if sale.tiers.is_empty() || sale.tiers.len() > MAX_PRICE_TIERS {
            return Err(LockupError::InvalidConfig);
        }
        for (i, tier) in sale.tiers.iter().enumerate() {
            if tier.price == 0 {
                return Err(LockupError::InvalidConfig);
            }
            if tier.lock_months > schedule.max_lock_months {
                return Err(LockupError::LockDurationExceeded);
            }
            if sale.tiers[..i].iter().any(|t| t.lock_months == tier.lock_months) {
                return Err(LockupError::InvalidConfig);
            }
        }

        let meta = &self.metadata;
        if meta.name.len() > MAX_NAME_LEN
            || meta.symbol.len() > MAX_SYMBOL_LEN
            || meta.uri.len() > MAX_URI_LEN
        {
            return Err(LockupError::MalformedRequest);
        }
        Ok(())
    }
}

/// Global supply, reserve and sale state. Single PDA per program.
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Registry {
    /// Regulator authority: direct grants, sale proceeds.
    pub regulator: Pubkey,
    /// Mint of the underlying token.
    pub underlying_mint: Pubkey,
    /// Token account holding the underlying reserve.
    pub reserve_vault: Pubkey,
    pub bump: u8,
    /// Outstanding wrapped principal (sum of all holder balances).
    pub total_supply: u64,
    /// Cumulative principal ever minted.
    pub minted_total: u64,
    /// Cumulative principal burned or swapped back.
    pub redeemed_total: u64,
    /// Cumulative sale payments forwarded to the regulator.
    pub payments_received: u64,
    /// Underlying available for swaps and burns.
    pub available_reserve: u64,
    pub sale: SaleConfig,
    pub schedule: ScheduleConfig,
    pub metadata: PromiseMetadata,
}

impl Registry {
    pub const SIZE: usize =
        32 + // regulator
        32 + // underlying_mint
        32 + // reserve_vault
        1 +  // bump
        8 +  // total_supply
        8 +  // minted_total
        8 +  // redeemed_total
        8 +  // payments_received
        8 +  // available_reserve
        SaleConfig::SIZE +
        ScheduleConfig::SIZE +
        PromiseMetadata::SIZE;

    pub fn address() -> (Pubkey, u8) {
        Pubkey::find_program_address(&[REGISTRY_SEED], &crate::ID)
    }

    pub fn reserve_address(registry: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[RESERVE_SEED, registry.as_ref()], &crate::ID)
    }

    pub fn new(
        regulator: Pubkey,
        underlying_mint: Pubkey,
        reserve_vault: Pubkey,
        bump: u8,
        config: RegistryConfig,
    ) -> std::result::Result<Self, LockupError> {
        config.validate()?;
        Ok(Self {
            regulator,
            underlying_mint,
            reserve_vault,
            bump,
            total_supply: 0,
            minted_total: 0,
            redeemed_total: 0,
            payments_received: 0,
            available_reserve: 0,
            sale: config.sale,
            schedule: config.schedule,
            metadata: config.metadata,
        })
    }

    /// Record freshly minted principal.
    pub fn record_mint(&mut self, amount: u64) -> std::result::Result<(), LockupError> {
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LockupError::MathOverflow)?;
        let minted_total = self
            .minted_total
            .checked_add(amount)
            .ok_or(LockupError::MathOverflow)?;
        self.total_supply = total_supply;
        self.minted_total = minted_total;
        Ok(())
    }

    /// Record principal leaving the system against the underlying reserve.
    pub fn record_redeem(&mut self, amount: u64) -> std::result::Result<(), LockupError> {
        let available_reserve = self
            .available_reserve
            .checked_sub(amount)
            .ok_or(LockupError::InsufficientUnderlyingReserve)?;
        let total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(LockupError::MathOverflow)?;
        let redeemed_total = self
            .redeemed_total
            .checked_add(amount)
            .ok_or(LockupError::MathOverflow)?;
        self.available_reserve = available_reserve;
        self.total_supply = total_supply;
        self.redeemed_total = redeemed_total;
        Ok(())
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            regulator: self.regulator,
            underlying_mint: self.underlying_mint,
            total_supply: self.total_supply,
            minted_total: self.minted_total,
            redeemed_total: self.redeemed_total,
            payments_received: self.payments_received,
            available_reserve: self.available_reserve,
            sale_start: self.sale.start,
            sale_end: self.sale.end,
            available_for_sale: self.sale.available_for_sale,
            min_purchase: self.sale.min_purchase,
            max_purchase: self.sale.max_purchase,
            tiers: self.sale.tiers.clone(),
            max_lock_months: self.schedule.max_lock_months,
            vesting_period: self.schedule.vesting_period,
        }
    }
}

/// Read-only view of the registry returned by `query_registry`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub regulator: Pubkey,
    pub underlying_mint: Pubkey,
    pub total_supply: u64,
    pub minted_total: u64,
    pub redeemed_total: u64,
    pub payments_received: u64,
    pub available_reserve: u64,
    pub sale_start: i64,
    pub sale_end: i64,
    pub available_for_sale: u64,
    pub min_purchase: u64,
    pub max_purchase: u64,
    pub tiers: Vec<PriceTier>,
    pub max_lock_months: u8,
    pub vesting_period: i64,
}
