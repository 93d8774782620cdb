//! Adversarial property-based test suite for the Volt energy engine.
//!
//! These tests attempt to break accounting invariants under randomized
//! inputs, driving the manager through its public API only.
//!
//! Attack vectors tested:
//! - Clock manipulation outside the period window
//! - Split staking vs. a single stake plus correction term
//! - Spend sequences that exceed production
//! - Interleaved withdrawals between spends
//! - Garbage period ids and unauthorized callers
//! - Long seeded sequences mixing spends, withdrawals, deposits and clock moves

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use volt_core::constants::{COIN, NO_PERIOD, RATE_PRECISION};
use volt_core::types::{Address, Period, TokenClass};
use volt_tests::helpers::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn no_production_before_start(
        balance in 1u128..1_000_000 * COIN,
        claimable in 1u128..1_000_000 * COIN,
        before in 1u64..365 * DAY,
    ) {
        let fx = Fixture::new();
        let id = fx.add_period(sixty_day_period());
        let alice = account(1);
        fx.stake(TokenClass::Primary, alice, T, balance);
        fx.stake(TokenClass::Lp, alice, T, balance);
        fx.auction.set_claimable(alice, claimable);
        fx.set_now(T - before.min(T));

        let b = fx.manager.production_breakdown(&alice, id).unwrap();
        prop_assert_eq!((b.primary, b.lp, b.lba), (0, 0, 0));
    }

    #[test]
    fn production_frozen_after_end(
        balance in 1u128..1_000_000 * COIN,
        after in 0u64..3_650 * DAY,
    ) {
        let fx = Fixture::new();
        let id = fx.add_period(sixty_day_period());
        let alice = account(1);
        fx.stake(TokenClass::Primary, alice, T + DAY, balance);
        fx.auction.set_claimable(alice, balance);

        fx.set_now(T + 60 * DAY);
        let at_end = fx.manager.production_breakdown(&alice, id).unwrap();
        fx.set_now(T + 60 * DAY + after);
        prop_assert_eq!(fx.manager.production_breakdown(&alice, id).unwrap(), at_end);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Staking `a` then `b` more equals staking `a + b` at once minus `b × gap`.
    #[test]
    fn split_stake_matches_correction_term(
        a in 0u128..1_000_000,
        b in 0u128..1_000_000,
        gap_days in 0u64..30,
        tail_days in 1u64..30,
    ) {
        let split = Fixture::new();
        let whole = Fixture::new();
        let period = Period::new(T, T + 60 * DAY, RATE_PRECISION, 0, 0);
        split.add_period(period);
        whole.add_period(period);

        let alice = account(1);
        let t2 = T + gap_days * DAY;
        let now = t2 + tail_days * DAY;
        split.stake(TokenClass::Primary, alice, T, a * COIN);
        split.stake(TokenClass::Primary, alice, t2, (a + b) * COIN);
        whole.stake(TokenClass::Primary, alice, T, (a + b) * COIN);
        split.set_now(now);
        whole.set_now(now);

        let split_energy = split.manager.calculate_energy(&alice, 1).unwrap();
        let whole_energy = whole.manager.calculate_energy(&alice, 1).unwrap();
        prop_assert_eq!(split_energy + b * COIN * gap_days as u128, whole_energy);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn spends_conserve_amount(
        requests in proptest::collection::vec(0u128..50 * COIN, 1..16),
        claimable in 0u128..20 * COIN,
        days in 1u64..60,
    ) {
        let fx = Fixture::new();
        let id = fx.add_period(sixty_day_period());
        let alice = account(1);
        fx.auction.set_claimable(alice, claimable);
        fx.set_now(T + days * DAY);
        let lba_produced = fx.manager.calculate_lba_energy(&alice, id).unwrap();

        for amount in &requests {
            let lba_before = fx.manager.get_consumed_lba_energy(&alice).unwrap();
            let reg_before = fx.manager.get_consumed_energy(&alice).unwrap();
            let available = lba_produced.saturating_sub(lba_before);

            let split = fx.manager.use_energy(&consumer(), &alice, id, *amount).unwrap();
            prop_assert_eq!(split.from_lba, (*amount).min(available));
            prop_assert_eq!(split.total(), *amount);

            let lba_after = fx.manager.get_consumed_lba_energy(&alice).unwrap();
            let reg_after = fx.manager.get_consumed_energy(&alice).unwrap();
            prop_assert_eq!((lba_after - lba_before) + (reg_after - reg_before), *amount);
        }

        prop_assert!(fx.manager.get_consumed_lba_energy(&alice).unwrap() <= lba_produced);
    }

    #[test]
    fn withdrawal_between_spends_never_draws_lba(
        first in 1u128..10 * COIN,
        second in 1u128..10 * COIN,
    ) {
        let fx = Fixture::new();
        let id = fx.add_period(sixty_day_period());
        let alice = account(1);
        fx.auction.set_claimable(alice, 100 * COIN);
        fx.set_now(T + DAY);

        fx.manager.use_energy(&consumer(), &alice, id, first).unwrap();
        fx.auction.withdraw_all(&alice);
        let split = fx.manager.use_energy(&consumer(), &alice, id, second).unwrap();
        prop_assert_eq!(split.from_lba, 0);
        prop_assert_eq!(split.from_regular, second);
    }

    #[test]
    fn available_never_underflows(
        stake in 0u128..100 * COIN,
        claimable in 0u128..100 * COIN,
        spend in 0u128..10_000 * COIN,
    ) {
        let fx = Fixture::new();
        let id = fx.add_period(sixty_day_period());
        let alice = account(1);
        fx.stake(TokenClass::Primary, alice, T, stake);
        fx.auction.set_claimable(alice, claimable);
        fx.set_now(T + 3 * DAY);

        fx.manager.use_energy(&consumer(), &alice, id, spend).unwrap();
        let produced = fx.manager.calculate_energy(&alice, id).unwrap()
            + fx.manager.calculate_lba_energy(&alice, id).unwrap();
        let current = fx.manager.energy_for_current_period(&alice).unwrap();
        prop_assert!(current <= produced);
        prop_assert_eq!(
            current,
            fx.manager.calculate_available_energy(&alice, id).unwrap()
                + fx.manager.calculate_available_lba_energy(&alice, id).unwrap()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn garbage_period_ids_rejected(id in 2u64..u64::MAX, amount in 0u128..COIN) {
        let fx = Fixture::new();
        fx.add_period(sixty_day_period());
        let alice = account(1);
        prop_assert!(fx.manager.calculate_energy(&alice, id).is_err());
        prop_assert!(fx.manager.calculate_energy(&alice, NO_PERIOD).is_err());
        prop_assert!(fx.manager.use_energy(&consumer(), &alice, id, amount).is_err());
        prop_assert_eq!(fx.manager.get_consumed_energy(&alice).unwrap(), 0);
    }

    #[test]
    fn strangers_cannot_mutate(seed in any::<[u8; 20]>()) {
        let stranger = Address::from_bytes(seed);
        prop_assume!(stranger != admin() && stranger != consumer());

        let fx = Fixture::new();
        let id = fx.add_period(sixty_day_period());
        let alice = account(1);
        prop_assert!(fx.manager.add_period(&stranger, sixty_day_period()).is_err());
        prop_assert!(fx.manager.update_period(&stranger, id, sixty_day_period()).is_err());
        prop_assert!(fx.manager.add_consumer(&stranger, &stranger).is_err());
        prop_assert!(fx.manager.use_energy(&stranger, &alice, id, 1).is_err());
        prop_assert_eq!(fx.manager.period_count(), 1);
        prop_assert!(!fx.manager.is_consumer(&stranger));
    }
}

// ---------------------------------------------------------------------------
// Seeded interleavings
// ---------------------------------------------------------------------------

/// Replays a seeded mix of spends, withdrawals, re-deposits and clock moves,
/// checking every spend against the LBA headroom observed just before it.
fn replay_seeded_sequence(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let fx = Fixture::new();
    let id = fx.add_period(sixty_day_period());
    let alice = account(1);
    fx.stake(TokenClass::Primary, alice, T, 10 * COIN);
    fx.auction.set_claimable(alice, 10 * COIN);

    let mut now = T;
    let mut requested = 0u128;
    for _ in 0..200 {
        match rng.gen_range(0..10) {
            0 => fx.auction.withdraw_all(&alice),
            1 => fx.auction.set_claimable(alice, rng.gen_range(0..20) * COIN),
            2 | 3 => {
                now += rng.gen_range(0..2 * DAY);
                fx.set_now(now);
            }
            _ => {
                let amount = rng.gen_range(0..30 * COIN);
                let produced = fx.manager.calculate_lba_energy(&alice, id).unwrap();
                let consumed = fx.manager.get_consumed_lba_energy(&alice).unwrap();
                let split = fx.manager.use_energy(&consumer(), &alice, id, amount).unwrap();
                assert_eq!(split.from_lba, amount.min(produced.saturating_sub(consumed)));
                assert_eq!(split.total(), amount);
                requested += amount;
            }
        }
        let total = fx.manager.get_consumed_energy(&alice).unwrap()
            + fx.manager.get_consumed_lba_energy(&alice).unwrap();
        assert_eq!(total, requested);
    }
}

#[test]
fn seeded_interleavings_conserve_spend() {
    for seed in 0..32 {
        replay_seeded_sequence(seed);
    }
}
