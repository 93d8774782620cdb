//! Shared fixtures for scenario and adversarial tests.

use std::sync::Arc;

use volt_core::clock::ManualClock;
use volt_core::constants::{RATE_PRECISION, SECONDS_PER_DAY};
use volt_core::memory::{MemoryAccessControl, MemoryAuction, MemoryCounterStore, MemoryHistory};
use volt_core::types::{Address, Period, TokenClass};
use volt_energy::{Collaborators, EnergyManager, EngineConfig};

pub const DAY: u64 = SECONDS_PER_DAY;

/// Reference start time used by every fixture.
pub const T: u64 = 1_700_000_000;

pub const LP_RATE: u128 = 1_360_000_000_000_000_000;
pub const LBA_RATE: u128 = 1_500_000_000_000_000_000;

pub fn admin() -> Address {
    Address::repeat(0xAD)
}

pub fn consumer() -> Address {
    Address::repeat(0xC0)
}

/// A user account derived from a seed byte.
pub fn account(seed: u8) -> Address {
    Address::repeat(seed)
}

/// `[T, T + 60d)` with rates `(1, 1.36, 1.5)`.
pub fn sixty_day_period() -> Period {
    Period::new(T, T + 60 * DAY, RATE_PRECISION, LP_RATE, LBA_RATE)
}

/// A manager wired to in-memory collaborators, with handles kept so tests
/// can drive history, auction state and time directly.
pub struct Fixture {
    pub manager: EnergyManager,
    pub history: Arc<MemoryHistory>,
    pub auction: Arc<MemoryAuction>,
    pub regular: Arc<MemoryCounterStore>,
    pub lba: Arc<MemoryCounterStore>,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    /// Default config, clock at `T`, auction released at `T`, and
    /// [`consumer()`] authorised.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let history = Arc::new(MemoryHistory::new());
        let auction = Arc::new(MemoryAuction::new(T));
        let regular = Arc::new(MemoryCounterStore::new());
        let lba = Arc::new(MemoryCounterStore::new());
        let clock = Arc::new(ManualClock::new(T));
        let manager = EnergyManager::new(
            config,
            Collaborators {
                history: history.clone(),
                auction: auction.clone(),
                regular_counters: regular.clone(),
                lba_counters: lba.clone(),
                access: Arc::new(MemoryAccessControl::with_manager(admin())),
                clock: clock.clone(),
            },
        );
        manager
            .add_consumer(&admin(), &consumer())
            .expect("admin can add consumer");
        Self {
            manager,
            history,
            auction,
            regular,
            lba,
            clock,
        }
    }

    /// Register `period` as the manager and return its id.
    pub fn add_period(&self, period: Period) -> u64 {
        self.manager
            .add_period(&admin(), period)
            .expect("valid period")
    }

    pub fn stake(&self, class: TokenClass, who: Address, at: u64, balance: u128) {
        self.history.record(class, who, at, balance);
    }

    pub fn set_now(&self, now: u64) {
        self.clock.set(now);
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
