//! Holder-facing exchange operations: transfer, burn, swap, reserve top-up.
//!
//! Each operation validates, stages the holder side on a copy and commits only
//! once every step has succeeded. A failed call leaves ledgers and registry
//! exactly as they were.

use anchor_lang::prelude::*;

use crate::engine::Effect;
use crate::error::LockupError;
use crate::state::{HolderLedger, LockWindow, Registry, Withdrawal};
use crate::utils::time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub withdrawal: Withdrawal,
    /// Window of the record created on the receiver, if re-locked.
    pub relocked: Option<LockWindow>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redemption {
    pub withdrawal: Withdrawal,
    pub effect: Effect,
}

pub fn transfer(
    caller: &Pubkey,
    registry: &Registry,
    from: &mut HolderLedger,
    to: &mut HolderLedger,
    amount: u64,
    relock: Option<LockWindow>,
    now: i64,
) -> std::result::Result<TransferReceipt, LockupError> {
    if *caller != from.owner {
        return Err(LockupError::Unauthorized);
    }
    if amount == 0 || from.owner == to.owner || from.registry != to.registry {
        return Err(LockupError::MalformedRequest);
    }
    if from.balance < amount {
        return Err(LockupError::InsufficientBalance);
    }

    let mut sender = from.clone();
    let withdrawal = sender.withdraw_up_to(amount, now)?;
    if withdrawal.granted < amount {
        return Err(LockupError::InsufficientUnlocked);
    }

    let mut receiver = to.clone();
    match relock {
        Some(window) => {
            time::check_explicit_window(&window, now, &registry.schedule)?;
            receiver.grant_lock(amount, window)?;
        }
        None => receiver.credit_free(amount)?,
    }

    *from = sender;
    *to = receiver;
    Ok(TransferReceipt {
        withdrawal,
        relocked: relock,
    })
}

/// Redeem unlocked promise value for underlying sent to `recipient`.
pub fn burn(
    caller: &Pubkey,
    registry: &mut Registry,
    holder: &mut HolderLedger,
    amount: u64,
    recipient: Pubkey,
    now: i64,
) -> std::result::Result<Redemption, LockupError> {
    if *caller != holder.owner {
        return Err(LockupError::Unauthorized);
    }
    if amount == 0 {
        return Err(LockupError::MalformedRequest);
    }
    if registry.available_reserve < amount {
        return Err(LockupError::InsufficientUnderlyingReserve);
    }
    if holder.balance < amount {
        return Err(LockupError::InsufficientBalance);
    }

    let mut staged = holder.clone();
    let withdrawal = staged.withdraw_up_to(amount, now)?;
    if withdrawal.granted < amount {
        return Err(LockupError::InsufficientUnlocked);
    }

    // Last fallible step; record_redeem writes nothing on error.
    registry.record_redeem(amount)?;
    *holder = staged;

    Ok(Redemption {
        withdrawal,
        effect: Effect::ReleaseUnderlying { recipient, amount },
    })
}

/// Burn with the underlying routed back to the holder.
pub fn swap(
    caller: &Pubkey,
    registry: &mut Registry,
    holder: &mut HolderLedger,
    amount: u64,
    now: i64,
) -> std::result::Result<Redemption, LockupError> {
    let recipient = holder.owner;
    burn(caller, registry, holder, amount, recipient, now)
}

pub fn top_up_reserve(registry: &mut Registry, amount: u64) -> std::result::Result<u64, LockupError> {
    if amount == 0 {
        return Err(LockupError::MalformedRequest);
    }
    registry.available_reserve = registry
        .available_reserve
        .checked_add(amount)
        .ok_or(LockupError::MathOverflow)?;
    Ok(registry.available_reserve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures;

    fn funded(owner: Pubkey, amount: u64, window: (i64, i64)) -> HolderLedger {
        let mut l = fixtures::ledger_for(owner);
        l.grant_lock(
            amount,
            LockWindow {
                start_unlock: window.0,
                end_unlock: window.1,
            },
        )
        .unwrap();
        l
    }

    #[test]
    fn transfer_moves_unlocked_value_lock_free() {
        let registry = fixtures::registry();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let mut from = funded(alice, 100, (0, 10));
        let mut to = fixtures::ledger_for(bob);

        let receipt = transfer(&alice, &registry, &mut from, &mut to, 60, None, 10).unwrap();
        assert_eq!(receipt.withdrawal.granted, 60);
        assert_eq!(from.balance, 40);
        assert_eq!(to.balance, 60);
        assert_eq!(to.released_pool, 60);
        assert!(to.records.is_empty());
        assert!(from.is_consistent() && to.is_consistent());
    }

    #[test]
    fn failed_transfer_leaves_both_sides_identical() {
        let registry = fixtures::registry();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let mut from = funded(alice, 100, (0, 10));
        from.credit_free(5).unwrap();
        let mut to = funded(bob, 7, (0, 1));
        let (from_before, to_before) = (from.clone(), to.clone());

        let err = transfer(&alice, &registry, &mut from, &mut to, 50, None, 2).unwrap_err();
        assert!(matches!(err, LockupError::InsufficientUnlocked));
        assert_eq!(from, from_before);
        assert_eq!(to, to_before);
    }

    #[test]
    fn relock_creates_record_on_receiver() {
        let registry = fixtures::registry();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let mut from = funded(alice, 100, (0, 10));
        let mut to = fixtures::ledger_for(bob);
        let window = LockWindow {
            start_unlock: 100,
            end_unlock: 200,
        };

        transfer(&alice, &registry, &mut from, &mut to, 100, Some(window), 10).unwrap();
        assert!(from.records.is_empty());
        assert_eq!(to.records.len(), 1);
        assert_eq!(to.records[0].window(), window);
        assert_eq!(to.released_pool, 0);
        assert_eq!(to.movable(150).unwrap(), 50);
    }

    #[test]
    fn relock_failure_rolls_back_debit() {
        let registry = fixtures::registry();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let mut from = funded(alice, 100, (0, 10));
        let mut to = fixtures::ledger_for(bob);
        let limit = time::max_lock_end(10, &registry.schedule).unwrap();
        let before = from.clone();

        let err = transfer(
            &alice,
            &registry,
            &mut from,
            &mut to,
            100,
            Some(LockWindow {
                start_unlock: 10,
                end_unlock: limit + 1,
            }),
            10,
        )
        .unwrap_err();
        assert!(matches!(err, LockupError::LockDurationExceeded));
        assert_eq!(from, before);
        assert_eq!(to.balance, 0);
    }

    #[test]
    fn transfer_requires_owner_and_distinct_parties() {
        let registry = fixtures::registry();
        let alice = Pubkey::new_unique();
        let mut from = funded(alice, 100, (0, 10));
        let mut other = fixtures::ledger_for(Pubkey::new_unique());
        let mut same = from.clone();

        assert!(matches!(
            transfer(&Pubkey::new_unique(), &registry, &mut from, &mut other, 1, None, 10),
            Err(LockupError::Unauthorized)
        ));
        assert!(matches!(
            transfer(&alice, &registry, &mut from, &mut same, 1, None, 10),
            Err(LockupError::MalformedRequest)
        ));
        assert!(matches!(
            transfer(&alice, &registry, &mut from, &mut other, 0, None, 10),
            Err(LockupError::MalformedRequest)
        ));
        assert!(matches!(
            transfer(&alice, &registry, &mut from, &mut other, 101, None, 10),
            Err(LockupError::InsufficientBalance)
        ));
    }

    #[test]
    fn burn_releases_underlying_to_recipient() {
        let mut registry = fixtures::registry();
        let alice = Pubkey::new_unique();
        let treasury = Pubkey::new_unique();
        registry.record_mint(100).unwrap();
        top_up_reserve(&mut registry, 300).unwrap();
        let mut holder = funded(alice, 100, (0, 10));

        let r = burn(&alice, &mut registry, &mut holder, 100, treasury, 10).unwrap();
        assert_eq!(
            r.effect,
            Effect::ReleaseUnderlying {
                recipient: treasury,
                amount: 100
            }
        );
        assert_eq!(registry.total_supply, 0);
        assert_eq!(registry.available_reserve, 200);
        assert_eq!(registry.redeemed_total, 100);
        assert!(holder.records.is_empty());
    }

    #[test]
    fn burn_before_unlock_fails_without_mutation() {
        let mut registry = fixtures::registry();
        let alice = Pubkey::new_unique();
        registry.record_mint(100).unwrap();
        top_up_reserve(&mut registry, 100).unwrap();
        let mut holder = funded(alice, 100, (50, 60));
        let before = holder.clone();

        let err = burn(&alice, &mut registry, &mut holder, 100, alice, 10).unwrap_err();
        assert!(matches!(err, LockupError::InsufficientUnlocked));
        assert_eq!(holder, before);
        assert_eq!(registry.total_supply, 100);
        assert_eq!(registry.available_reserve, 100);
    }

    #[test]
    fn swap_short_reserve_is_rejected_first() {
        let mut registry = fixtures::registry();
        let alice = Pubkey::new_unique();
        registry.record_mint(100).unwrap();
        top_up_reserve(&mut registry, 99).unwrap();
        let mut holder = funded(alice, 100, (0, 10));
        let before = holder.clone();

        let err = swap(&alice, &mut registry, &mut holder, 100, 20).unwrap_err();
        assert!(matches!(err, LockupError::InsufficientUnderlyingReserve));
        assert_eq!(holder, before);
        assert_eq!(registry.available_reserve, 99);
        assert_eq!(registry.total_supply, 100);
    }

    #[test]
    fn swap_routes_to_holder() {
        let mut registry = fixtures::registry();
        let alice = Pubkey::new_unique();
        registry.record_mint(100).unwrap();
        top_up_reserve(&mut registry, 100).unwrap();
        let mut holder = funded(alice, 100, (0, 10));

        let r = swap(&alice, &mut registry, &mut holder, 40, 5).unwrap();
        assert_eq!(
            r.effect,
            Effect::ReleaseUnderlying {
                recipient: alice,
                amount: 40
            }
        );
        assert_eq!(holder.balance, 60);
        assert_eq!(registry.available_reserve, 60);
    }

    #[test]
    fn zero_top_up_is_malformed() {
        let mut registry = fixtures::registry();
        assert!(matches!(
            top_up_reserve(&mut registry, 0),
            Err(LockupError::MalformedRequest)
        ));
    }
}
