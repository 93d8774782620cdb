//! Consumption allocator: LBA-first split of spend requests across the two pools.
//!
//! Priority is fixed: LBA energy is drained first, up to what is currently
//! available, and the regular pool absorbs the remainder unconditionally.
//! The regular counter may therefore exceed regular production; read paths
//! floor availability at zero.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use volt_core::error::{EnergyError, VoltError};
use volt_core::traits::CounterStore;
use volt_core::types::{Address, Pool};

/// How a spend request was divided between the pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsumptionSplit {
    pub from_lba: u128,
    pub from_regular: u128,
}

impl ConsumptionSplit {
    /// Total amount committed. Always equals the requested amount.
    pub fn total(&self) -> u128 {
        self.from_lba + self.from_regular
    }
}

/// Split `amount`, taking up to `lba_available` from the LBA pool first.
pub fn split_consumption(amount: u128, lba_available: u128) -> ConsumptionSplit {
    let from_lba = amount.min(lba_available);
    ConsumptionSplit {
        from_lba,
        from_regular: amount - from_lba,
    }
}

/// Owns the two pool counter stores and serialises check-then-commit.
pub struct ConsumptionAllocator {
    regular: Arc<dyn CounterStore>,
    lba: Arc<dyn CounterStore>,
    commit_lock: Mutex<()>,
}

impl ConsumptionAllocator {
    pub fn new(regular: Arc<dyn CounterStore>, lba: Arc<dyn CounterStore>) -> Self {
        Self {
            regular,
            lba,
            commit_lock: Mutex::new(()),
        }
    }

    fn store(&self, pool: Pool) -> &dyn CounterStore {
        match pool {
            Pool::Regular => self.regular.as_ref(),
            Pool::Lba => self.lba.as_ref(),
        }
    }

    /// Raw consumed counter for `account` in `pool`.
    pub fn consumed(&self, pool: Pool, account: &Address) -> Result<u128, VoltError> {
        self.store(pool).consumed_amount(account)
    }

    /// Raw earned counter for `account` in `pool`.
    pub fn earned(&self, pool: Pool, account: &Address) -> Result<u128, VoltError> {
        self.store(pool).earned_amount(account)
    }

    /// Add to the earned counter. Independent of accrual and consumption.
    pub fn record_earned(&self, pool: Pool, account: &Address, amount: u128) -> Result<(), VoltError> {
        self.store(pool).increase_earned_amount(account, amount)
    }

    /// Spend `amount` for `account`.
    ///
    /// `lba_production` is evaluated under the commit lock, so two concurrent
    /// requests cannot both see the same LBA headroom. Both counter increments
    /// are checked for overflow before either is written, and a failed
    /// regular write reverts the LBA write.
    pub fn allocate<F>(
        &self,
        account: &Address,
        amount: u128,
        lba_production: F,
    ) -> Result<ConsumptionSplit, VoltError>
    where
        F: FnOnce() -> Result<u128, VoltError>,
    {
        let _guard = self.commit_lock.lock();

        let produced_lba = lba_production()?;
        let consumed_lba = self.lba.consumed_amount(account)?;
        let consumed_regular = self.regular.consumed_amount(account)?;

        let split = split_consumption(amount, produced_lba.saturating_sub(consumed_lba));

        consumed_lba
            .checked_add(split.from_lba)
            .ok_or(EnergyError::ArithmeticOverflow)?;
        consumed_regular
            .checked_add(split.from_regular)
            .ok_or(EnergyError::ArithmeticOverflow)?;

        if split.from_lba > 0 {
            self.lba.increase_consumed_amount(account, split.from_lba)?;
        }
        if split.from_regular > 0 {
            if let Err(e) = self.regular.increase_consumed_amount(account, split.from_regular) {
                self.rollback_lba(account, split.from_lba);
                return Err(e);
            }
        }

        debug!(
            %account,
            produced_lba,
            consumed_lba,
            from_lba = split.from_lba,
            from_regular = split.from_regular,
            "allocator: committed"
        );
        Ok(split)
    }

    fn rollback_lba(&self, account: &Address, from_lba: u128) {
        if from_lba == 0 {
            return;
        }
        if let Err(e) = self.lba.revert_consumed_amount(account, from_lba) {
            error!(%account, from_lba, error = %e, "allocator: lba rollback failed");
        }
    }
}
