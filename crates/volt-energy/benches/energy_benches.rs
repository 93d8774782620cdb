//! Criterion benchmarks for volt-energy hot paths.
//!
//! Covers: balance-history integration, end-to-end energy reads, and
//! consumption commits.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use volt_core::clock::ManualClock;
use volt_core::constants::{COIN, RATE_PRECISION, SECONDS_PER_DAY};
use volt_core::memory::{MemoryAccessControl, MemoryAuction, MemoryCounterStore, MemoryHistory};
use volt_core::types::{Address, Period, StakeEvent, TokenClass};
use volt_energy::math::balance_volume;
use volt_energy::{Collaborators, EnergyManager, EngineConfig};

const T: u64 = 1_700_000_000;
const SPAN: u64 = 90 * SECONDS_PER_DAY;

fn random_history(n: usize) -> Vec<StakeEvent> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut ts: Vec<u64> = (0..n).map(|_| T + rng.gen_range(0..SPAN)).collect();
    ts.sort_unstable();
    ts.into_iter()
        .map(|t| StakeEvent::new(t, rng.gen_range(0..1_000_000) * COIN))
        .collect()
}

fn bench_balance_volume(c: &mut Criterion) {
    let events = random_history(1_000);

    c.bench_function("balance_volume_1000_events", |b| {
        b.iter(|| balance_volume(black_box(&events), T, T + SPAN))
    });
}

fn manager() -> (EnergyManager, Address, Address) {
    let admin = Address::repeat(0xAD);
    let consumer = Address::repeat(0xC0);
    let account = Address::repeat(0xA1);

    let history = Arc::new(MemoryHistory::new());
    for e in random_history(500) {
        history.record(TokenClass::Primary, account, e.timestamp, e.balance);
        history.record(TokenClass::Lp, account, e.timestamp, e.balance / 2);
    }
    let auction = Arc::new(MemoryAuction::new(T));
    auction.set_claimable(account, 10 * COIN);

    let manager = EnergyManager::new(
        EngineConfig::default(),
        Collaborators {
            history,
            auction,
            regular_counters: Arc::new(MemoryCounterStore::new()),
            lba_counters: Arc::new(MemoryCounterStore::new()),
            access: Arc::new(MemoryAccessControl::with_manager(admin)),
            clock: Arc::new(ManualClock::new(T + SPAN / 2)),
        },
    );
    let period = Period::new(T, T + SPAN, RATE_PRECISION, RATE_PRECISION, RATE_PRECISION);
    // Setup only; these calls cannot fail for the fixed inputs above.
    let _ = manager.add_period(&admin, period);
    let _ = manager.add_consumer(&admin, &consumer);
    (manager, consumer, account)
}

fn bench_energy_for_period(c: &mut Criterion) {
    let (manager, _, account) = manager();

    c.bench_function("energy_for_period_500_events", |b| {
        b.iter(|| manager.energy_for_period(black_box(&account), 1))
    });
}

fn bench_use_energy(c: &mut Criterion) {
    let (manager, consumer, account) = manager();

    c.bench_function("use_energy", |b| {
        b.iter(|| manager.use_energy(&consumer, black_box(&account), 1, black_box(1)))
    });
}

criterion_group!(
    benches,
    bench_balance_volume,
    bench_energy_for_period,
    bench_use_energy
);
criterion_main!(benches);
