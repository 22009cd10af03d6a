//! Sale admission and direct lock grants.
//!
//! Purchase checks run in a fixed order (window, tier, payment size, stock)
//! and the first failing check decides the error. Nothing is written until all
//! pass.

use anchor_lang::prelude::*;

use crate::constants::PRICE_SCALE;
use crate::engine::Effect;
use crate::error::LockupError;
use crate::state::{HolderLedger, LockWindow, Registry, SalePhase};
use crate::utils::time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub tokens_out: u64,
    pub window: LockWindow,
    pub effect: Effect,
}

/// Promise tokens bought by `payment` at `price`. Only whole tokens are sold;
/// the fractional remainder of the payment buys nothing.
pub fn tokens_for_payment(payment: u64, price: u64) -> std::result::Result<u64, LockupError> {
    if price == 0 {
        return Err(LockupError::InvalidConfig);
    }
    (payment / price)
        .checked_mul(PRICE_SCALE)
        .ok_or(LockupError::MathOverflow)
}

pub fn purchase(
    caller: &Pubkey,
    registry: &mut Registry,
    buyer: &mut HolderLedger,
    payment: u64,
    lock_months: u8,
    now: i64,
) -> std::result::Result<PurchaseReceipt, LockupError> {
    if *caller != buyer.owner {
        return Err(LockupError::Unauthorized);
    }
    match registry.sale.phase(now) {
        SalePhase::Before => return Err(LockupError::SaleNotStarted),
        SalePhase::Closed => return Err(LockupError::SaleEnded),
        SalePhase::Open => {}
    }
    let price = registry
        .sale
        .price_for(lock_months)
        .ok_or(LockupError::UnknownTier)?;

    // Size limits bound the payment, not the tokens it buys.
    if payment < registry.sale.min_purchase {
        return Err(LockupError::BelowMinimum);
    }
    if payment > registry.sale.max_purchase {
        return Err(LockupError::AboveMaximum);
    }
    let tokens_out = tokens_for_payment(payment, price)?;
    let available_for_sale = registry
        .sale
        .available_for_sale
        .checked_sub(tokens_out)
        .ok_or(LockupError::SoldOut)?;

    let window = time::lock_window(now, lock_months, &registry.schedule)?;
    let mut staged = buyer.clone();
    staged.grant_lock(tokens_out, window)?;

    let payments_received = registry
        .payments_received
        .checked_add(payment)
        .ok_or(LockupError::MathOverflow)?;
    registry.record_mint(tokens_out)?;
    registry.sale.available_for_sale = available_for_sale;
    registry.payments_received = payments_received;
    *buyer = staged;

    Ok(PurchaseReceipt {
        tokens_out,
        window,
        effect: Effect::ForwardPayment {
            to: registry.regulator,
            amount: payment,
        },
    })
}

/// Regulator-initiated lock outside the sale. Skips window, tier, size and
/// stock checks but still bounds the lock period.
pub fn grant_lock(
    caller: &Pubkey,
    registry: &mut Registry,
    holder: &mut HolderLedger,
    principal: u64,
    lock_months: u8,
    now: i64,
) -> std::result::Result<LockWindow, LockupError> {
    if *caller != registry.regulator {
        return Err(LockupError::Unauthorized);
    }
    if principal == 0 {
        return Err(LockupError::MalformedRequest);
    }
    if lock_months > registry.schedule.max_lock_months {
        return Err(LockupError::LockDurationExceeded);
    }

    let window = time::lock_window(now, lock_months, &registry.schedule)?;
    let mut staged = holder.clone();
    staged.grant_lock(principal, window)?;
    registry.record_mint(principal)?;
    *holder = staged;
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_LOCK_RECORDS, SECONDS_PER_MONTH};
    use crate::engine::fixtures::{self, SALE_START, SALE_END, TOKEN, VESTING};

    #[test]
    fn tier_prices_match_expected_token_counts() {
        let registry = fixtures::registry();
        let out = |months| {
            tokens_for_payment(100 * TOKEN, registry.sale.price_for(months).unwrap()).unwrap()
        };
        assert_eq!(out(3), 100 * TOKEN);
        assert_eq!(out(6), 111 * TOKEN);
        assert_eq!(out(12), 125 * TOKEN);
    }

    #[test]
    fn purchase_mints_locked_position() {
        let mut registry = fixtures::registry();
        let buyer = Pubkey::new_unique();
        let mut ledger = fixtures::ledger_for(buyer);

        let r = purchase(&buyer, &mut registry, &mut ledger, 100 * TOKEN, 3, SALE_START).unwrap();
        assert_eq!(r.tokens_out, 100 * TOKEN);
        assert_eq!(r.window.start_unlock, SALE_START + 3 * SECONDS_PER_MONTH);
        assert_eq!(r.window.end_unlock, r.window.start_unlock + VESTING);
        assert_eq!(
            r.effect,
            Effect::ForwardPayment {
                to: registry.regulator,
                amount: 100 * TOKEN
            }
        );

        assert_eq!(ledger.records.len(), 1);
        assert_eq!(ledger.records[0].locked_amount, 100 * TOKEN);
        assert_eq!(registry.total_supply, 100 * TOKEN);
        assert_eq!(registry.minted_total, 100 * TOKEN);
        assert_eq!(registry.payments_received, 100 * TOKEN);
        assert_eq!(registry.sale.available_for_sale, 9_900 * TOKEN);
    }

    #[test]
    fn purchase_rejections_leave_registry_unchanged() {
        let cases: [(u64, u8, i64, fn(&LockupError) -> bool); 8] = [
            (100 * TOKEN, 3, SALE_START - 1, |e| matches!(e, LockupError::SaleNotStarted)),
            (100 * TOKEN, 3, SALE_END, |e| matches!(e, LockupError::SaleEnded)),
            (100 * TOKEN, 4, SALE_START, |e| matches!(e, LockupError::UnknownTier)),
            (99 * TOKEN, 3, SALE_START, |e| matches!(e, LockupError::BelowMinimum)),
            (1_001 * TOKEN, 3, SALE_START, |e| matches!(e, LockupError::AboveMaximum)),
            // 99 at 0.8 would buy 123 tokens; the payment is still too small.
            (99 * TOKEN, 12, SALE_START, |e| matches!(e, LockupError::BelowMinimum)),
            (1_001 * TOKEN, 12, SALE_START, |e| matches!(e, LockupError::AboveMaximum)),
            (0, 3, SALE_START, |e| matches!(e, LockupError::BelowMinimum)),
        ];
        for (payment, months, now, expected) in cases {
            let mut registry = fixtures::registry();
            let buyer = Pubkey::new_unique();
            let mut ledger = fixtures::ledger_for(buyer);
            let (registry_before, ledger_before) = (registry.clone(), ledger.clone());

            let err = purchase(&buyer, &mut registry, &mut ledger, payment, months, now).unwrap_err();
            assert!(expected(&err), "unexpected error {err:?}");
            assert_eq!(registry, registry_before);
            assert_eq!(ledger, ledger_before);
        }
    }

    #[test]
    fn discounted_tiers_sell_whole_tokens() {
        let mut registry = fixtures::registry();
        let buyer = Pubkey::new_unique();
        let mut ledger = fixtures::ledger_for(buyer);

        let r = purchase(&buyer, &mut registry, &mut ledger, 100 * TOKEN, 6, SALE_START).unwrap();
        assert_eq!(r.tokens_out, 111 * TOKEN);
        assert_eq!(registry.sale.available_for_sale, 9_889 * TOKEN);

        let r = purchase(&buyer, &mut registry, &mut ledger, 100 * TOKEN, 3, SALE_START).unwrap();
        assert_eq!(r.tokens_out, 100 * TOKEN);
        assert_eq!(registry.total_supply, 211 * TOKEN);
        assert_eq!(registry.payments_received, 200 * TOKEN);
        assert_eq!(ledger.balance, 211 * TOKEN);
    }

    #[test]
    fn maximum_payment_at_discount_exceeds_token_limit() {
        let mut registry = fixtures::registry();
        let buyer = Pubkey::new_unique();
        let mut ledger = fixtures::ledger_for(buyer);

        let r = purchase(&buyer, &mut registry, &mut ledger, 1_000 * TOKEN, 12, SALE_START)
            .unwrap();
        assert_eq!(r.tokens_out, 1_250 * TOKEN);
        assert_eq!(registry.sale.available_for_sale, 8_750 * TOKEN);
        assert_eq!(registry.payments_received, 1_000 * TOKEN);
    }

    #[test]
    fn sells_out_after_stock_is_gone() {
        let mut registry = fixtures::registry();
        for _ in 0..10 {
            let buyer = Pubkey::new_unique();
            let mut ledger = fixtures::ledger_for(buyer);
            purchase(&buyer, &mut registry, &mut ledger, 1_000 * TOKEN, 3, SALE_START).unwrap();
        }
        assert_eq!(registry.sale.available_for_sale, 0);
        assert_eq!(registry.total_supply, 10_000 * TOKEN);

        let buyer = Pubkey::new_unique();
        let mut ledger = fixtures::ledger_for(buyer);
        let err = purchase(&buyer, &mut registry, &mut ledger, 1_000 * TOKEN, 3, SALE_START)
            .unwrap_err();
        assert!(matches!(err, LockupError::SoldOut));
        assert_eq!(registry.total_supply, 10_000 * TOKEN);
    }

    #[test]
    fn full_ledger_rejects_purchase_atomically() {
        let mut registry = fixtures::registry();
        let buyer = Pubkey::new_unique();
        let mut ledger = fixtures::ledger_for(buyer);
        for _ in 0..MAX_LOCK_RECORDS {
            ledger
                .grant_lock(
                    1,
                    LockWindow {
                        start_unlock: 0,
                        end_unlock: 0,
                    },
                )
                .unwrap();
        }
        let before = registry.clone();
        let err = purchase(&buyer, &mut registry, &mut ledger, 100 * TOKEN, 3, SALE_START)
            .unwrap_err();
        assert!(matches!(err, LockupError::LockSlotsFull));
        assert_eq!(registry, before);
    }

    #[test]
    fn purchase_for_someone_else_is_unauthorized() {
        let mut registry = fixtures::registry();
        let mut ledger = fixtures::ledger_for(Pubkey::new_unique());
        let err = purchase(
            &Pubkey::new_unique(),
            &mut registry,
            &mut ledger,
            100 * TOKEN,
            3,
            SALE_START,
        )
        .unwrap_err();
        assert!(matches!(err, LockupError::Unauthorized));
    }

    #[test]
    fn direct_grant_skips_sale_rules_but_bounds_duration() {
        let mut registry = fixtures::registry();
        let regulator = registry.regulator;
        let holder = Pubkey::new_unique();
        let mut ledger = fixtures::ledger_for(holder);

        // Outside the sale window, below the minimum, non-tier period.
        let w = grant_lock(&regulator, &mut registry, &mut ledger, 5, 5, 0).unwrap();
        assert_eq!(w.start_unlock, 5 * SECONDS_PER_MONTH);
        assert_eq!(registry.total_supply, 5);
        assert_eq!(registry.minted_total, 5);
        assert_eq!(registry.sale.available_for_sale, 10_000 * TOKEN);
        assert_eq!(registry.available_reserve, 0);

        let err = grant_lock(&regulator, &mut registry, &mut ledger, 5, 13, 0).unwrap_err();
        assert!(matches!(err, LockupError::LockDurationExceeded));
        let err = grant_lock(&holder, &mut registry, &mut ledger, 5, 3, 0).unwrap_err();
        assert!(matches!(err, LockupError::Unauthorized));
        assert_eq!(ledger.records.len(), 1);
        assert_eq!(registry.total_supply, 5);
    }
}
