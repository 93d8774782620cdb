//! [`EnergyManager`]: the public surface of the engine.
//!
//! Composes the period registry, accrual engine and consumption allocator
//! with the access-control and clock collaborators. Every call reads
//! collaborator state at call time; nothing is cached between calls.
//!
//! Validation order for gated calls is role, then account, then period.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};
use volt_core::constants::NO_PERIOD;
use volt_core::error::{EnergyError, Role, VoltError};
use volt_core::traits::{AccessControl, AuctionOracle, Clock, CounterStore, HistoryProvider};
use volt_core::types::{Address, Period, PeriodId, Pool, TokenClass};

use crate::accrual::{AccrualEngine, EnergyBreakdown};
use crate::allocator::{ConsumptionAllocator, ConsumptionSplit};
use crate::config::{EngineConfig, LbaAccrualStart};
use crate::math;
use crate::registry::PeriodRegistry;

/// External collaborators an [`EnergyManager`] is wired to.
pub struct Collaborators {
    pub history: Arc<dyn HistoryProvider>,
    pub auction: Arc<dyn AuctionOracle>,
    pub regular_counters: Arc<dyn CounterStore>,
    pub lba_counters: Arc<dyn CounterStore>,
    pub access: Arc<dyn AccessControl>,
    pub clock: Arc<dyn Clock>,
}

/// A resolved period plus the LBA accrual start that applies to it.
struct Resolved {
    period: Period,
    lba_start: u64,
}

pub struct EnergyManager {
    config: EngineConfig,
    registry: RwLock<PeriodRegistry>,
    accrual: AccrualEngine,
    allocator: ConsumptionAllocator,
    access: Arc<dyn AccessControl>,
    clock: Arc<dyn Clock>,
}

impl EnergyManager {
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            history,
            auction,
            regular_counters,
            lba_counters,
            access,
            clock,
        } = collaborators;
        Self {
            config,
            registry: RwLock::new(PeriodRegistry::new()),
            accrual: AccrualEngine::new(history, auction),
            allocator: ConsumptionAllocator::new(regular_counters, lba_counters),
            access,
            clock,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current time according to the configured clock.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    // ------------------------------------------------------------------
    // Period registry
    // ------------------------------------------------------------------

    pub fn add_period(&self, caller: &Address, period: Period) -> Result<PeriodId, VoltError> {
        self.require(caller, Role::Manager)?;
        Ok(self.registry.write().add_period(period)?)
    }

    pub fn add_periods(&self, caller: &Address, periods: &[Period]) -> Result<Vec<PeriodId>, VoltError> {
        self.require(caller, Role::Manager)?;
        Ok(self.registry.write().add_periods(periods)?)
    }

    pub fn update_period(&self, caller: &Address, id: PeriodId, period: Period) -> Result<(), VoltError> {
        self.require(caller, Role::Manager)?;
        Ok(self.registry.write().update_period(id, period)?)
    }

    pub fn get_period(&self, id: PeriodId) -> Result<Period, VoltError> {
        Ok(self.registry.read().get_period(id)?)
    }

    /// Id of the period active now, or `0`.
    pub fn current_period_id(&self) -> PeriodId {
        self.registry.read().current_period_id(self.now())
    }

    /// The period active now, or `Period::default()` when none is.
    pub fn current_period(&self) -> Period {
        self.registry.read().current_period(self.now())
    }

    pub fn period_count(&self) -> u64 {
        self.registry.read().period_count()
    }

    // ------------------------------------------------------------------
    // Production
    // ------------------------------------------------------------------

    /// Regular production (`primary + lp`) for `account` in period `id`.
    pub fn calculate_energy(&self, account: &Address, id: PeriodId) -> Result<u128, VoltError> {
        Ok(self.production_breakdown(account, id)?.regular()?)
    }

    pub fn calculate_primary_energy(&self, account: &Address, id: PeriodId) -> Result<u128, VoltError> {
        self.stake_energy(TokenClass::Primary, account, id)
    }

    pub fn calculate_lp_energy(&self, account: &Address, id: PeriodId) -> Result<u128, VoltError> {
        self.stake_energy(TokenClass::Lp, account, id)
    }

    /// LBA production for `account` in period `id`, from the live claimable amount.
    pub fn calculate_lba_energy(&self, account: &Address, id: PeriodId) -> Result<u128, VoltError> {
        ensure_account(account)?;
        let r = self.resolve(id)?;
        self.accrual.lba_energy(account, &r.period, self.now(), r.lba_start)
    }

    /// LBA production minus LBA consumption, floored at zero.
    pub fn calculate_available_lba_energy(&self, account: &Address, id: PeriodId) -> Result<u128, VoltError> {
        let produced = self.calculate_lba_energy(account, id)?;
        let consumed = self.allocator.consumed(Pool::Lba, account)?;
        Ok(math::available(produced, consumed))
    }

    /// Regular production minus regular consumption, floored at zero.
    pub fn calculate_available_energy(&self, account: &Address, id: PeriodId) -> Result<u128, VoltError> {
        let produced = self.calculate_energy(account, id)?;
        let consumed = self.allocator.consumed(Pool::Regular, account)?;
        Ok(math::available(produced, consumed))
    }

    pub fn production_breakdown(&self, account: &Address, id: PeriodId) -> Result<EnergyBreakdown, VoltError> {
        ensure_account(account)?;
        let r = self.resolve(id)?;
        self.accrual.breakdown(account, &r.period, self.now(), r.lba_start)
    }

    /// Available regular plus available LBA energy for period `id`.
    pub fn energy_for_period(&self, account: &Address, id: PeriodId) -> Result<u128, VoltError> {
        let breakdown = self.production_breakdown(account, id)?;
        let regular = math::available(
            breakdown.regular()?,
            self.allocator.consumed(Pool::Regular, account)?,
        );
        let lba = math::available(breakdown.lba, self.allocator.consumed(Pool::Lba, account)?);
        Ok(regular
            .checked_add(lba)
            .ok_or(EnergyError::ArithmeticOverflow)?)
    }

    /// [`energy_for_period`](Self::energy_for_period) for the active period; 0 when none is active.
    pub fn energy_for_current_period(&self, account: &Address) -> Result<u128, VoltError> {
        ensure_account(account)?;
        match self.current_period_id() {
            NO_PERIOD => Ok(0),
            id => self.energy_for_period(account, id),
        }
    }

    // ------------------------------------------------------------------
    // Daily production rates
    // ------------------------------------------------------------------

    pub fn daily_primary_energy_production(&self, account: &Address) -> Result<u128, VoltError> {
        self.daily_stake(TokenClass::Primary, account)
    }

    pub fn daily_lp_energy_production(&self, account: &Address) -> Result<u128, VoltError> {
        self.daily_stake(TokenClass::Lp, account)
    }

    pub fn daily_lba_energy_production(&self, account: &Address) -> Result<u128, VoltError> {
        ensure_account(account)?;
        let now = self.now();
        let Some(r) = self.resolve_current(now)? else {
            return Ok(0);
        };
        self.accrual.daily_lba_production(account, &r.period, now, r.lba_start)
    }

    /// Sum of the three daily rates.
    pub fn daily_energy_production(&self, account: &Address) -> Result<u128, VoltError> {
        [
            self.daily_primary_energy_production(account)?,
            self.daily_lp_energy_production(account)?,
            self.daily_lba_energy_production(account)?,
        ]
        .into_iter()
        .try_fold(0u128, u128::checked_add)
        .ok_or_else(|| EnergyError::ArithmeticOverflow.into())
    }

    // ------------------------------------------------------------------
    // Consumption
    // ------------------------------------------------------------------

    /// Spend `amount` of `account`'s energy for period `id`, LBA pool first.
    ///
    /// # Errors
    ///
    /// - [`EnergyError::Unauthorized`] if `caller` is not an authorized consumer
    /// - [`EnergyError::InvalidInput`] if `account` is the zero address
    /// - [`EnergyError::InvalidPeriod`] if `id` is not an assigned period
    /// - [`EnergyError::ArithmeticOverflow`] if either counter would overflow
    /// - a collaborator error if a counter store write fails
    ///
    /// No counter changes on error: a failed regular write reverts the LBA write.
    pub fn use_energy(
        &self,
        caller: &Address,
        account: &Address,
        id: PeriodId,
        amount: u128,
    ) -> Result<ConsumptionSplit, VoltError> {
        let split = match self.commit_use(caller, account, id, amount) {
            Ok(split) => split,
            Err(e) => {
                warn!(%caller, %account, period_id = id, amount, error = %e, "energy: use rejected");
                return Err(e);
            }
        };
        info!(
            %caller,
            %account,
            period_id = id,
            amount,
            from_lba = split.from_lba,
            from_regular = split.from_regular,
            "energy: consumed"
        );
        Ok(split)
    }

    fn commit_use(
        &self,
        caller: &Address,
        account: &Address,
        id: PeriodId,
        amount: u128,
    ) -> Result<ConsumptionSplit, VoltError> {
        self.require(caller, Role::Consumer)?;
        ensure_account(account)?;
        // The registry stays read-locked while the headroom is computed, so the
        // period window and the clock reading belong to the same registry state.
        self.allocator.allocate(account, amount, || {
            let registry = self.registry.read();
            let r = self.resolve_in(&registry, id)?;
            self.accrual.lba_energy(account, &r.period, self.now(), r.lba_start)
        })
    }

    pub fn get_consumed_energy(&self, account: &Address) -> Result<u128, VoltError> {
        ensure_account(account)?;
        self.allocator.consumed(Pool::Regular, account)
    }

    pub fn get_consumed_lba_energy(&self, account: &Address) -> Result<u128, VoltError> {
        ensure_account(account)?;
        self.allocator.consumed(Pool::Lba, account)
    }

    // ------------------------------------------------------------------
    // Earned bookkeeping
    // ------------------------------------------------------------------

    /// Record earned energy in `pool`'s counter. Not linked to accrual.
    pub fn record_earned_energy(
        &self,
        caller: &Address,
        account: &Address,
        pool: Pool,
        amount: u128,
    ) -> Result<(), VoltError> {
        self.require(caller, Role::Manager)?;
        ensure_account(account)?;
        self.allocator.record_earned(pool, account, amount)?;
        info!(%account, %pool, amount, "energy: earned recorded");
        Ok(())
    }

    pub fn get_earned_energy(&self, account: &Address) -> Result<u128, VoltError> {
        ensure_account(account)?;
        self.allocator.earned(Pool::Regular, account)
    }

    pub fn get_earned_lba_energy(&self, account: &Address) -> Result<u128, VoltError> {
        ensure_account(account)?;
        self.allocator.earned(Pool::Lba, account)
    }

    // ------------------------------------------------------------------
    // Consumer allow-list
    // ------------------------------------------------------------------

    pub fn add_consumer(&self, caller: &Address, consumer: &Address) -> Result<(), VoltError> {
        self.require(caller, Role::Manager)?;
        ensure_account(consumer)?;
        self.access.grant_consumer(consumer);
        info!(%consumer, "access: consumer added");
        Ok(())
    }

    pub fn remove_consumer(&self, caller: &Address, consumer: &Address) -> Result<(), VoltError> {
        self.require(caller, Role::Manager)?;
        ensure_account(consumer)?;
        self.access.revoke_consumer(consumer);
        info!(%consumer, "access: consumer removed");
        Ok(())
    }

    pub fn is_consumer(&self, address: &Address) -> bool {
        self.access.is_authorized_consumer(address)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn require(&self, caller: &Address, role: Role) -> Result<(), EnergyError> {
        let allowed = match role {
            Role::Manager => self.access.is_manager(caller),
            Role::Consumer => self.access.is_authorized_consumer(caller),
        };
        if !allowed {
            warn!(%caller, %role, "access: rejected");
            return Err(EnergyError::Unauthorized {
                caller: caller.to_string(),
                role,
            });
        }
        Ok(())
    }

    fn stake_energy(&self, class: TokenClass, account: &Address, id: PeriodId) -> Result<u128, VoltError> {
        ensure_account(account)?;
        let r = self.resolve(id)?;
        self.accrual.stake_energy(class, account, &r.period, self.now())
    }

    fn daily_stake(&self, class: TokenClass, account: &Address) -> Result<u128, VoltError> {
        ensure_account(account)?;
        let now = self.now();
        let Some(r) = self.resolve_current(now)? else {
            return Ok(0);
        };
        self.accrual.daily_stake_production(class, account, &r.period, now)
    }

    /// Look up period `id` and the LBA accrual start.
    fn resolve(&self, id: PeriodId) -> Result<Resolved, VoltError> {
        let registry = self.registry.read();
        self.resolve_in(&registry, id)
    }

    /// [`resolve`](Self::resolve) against a registry the caller already holds.
    fn resolve_in(&self, registry: &PeriodRegistry, id: PeriodId) -> Result<Resolved, VoltError> {
        let period = registry.get_period(id)?;
        let lba_start = self.lba_accrual_start(registry.earliest_start(), &period)?;
        Ok(Resolved { period, lba_start })
    }

    fn resolve_current(&self, now: u64) -> Result<Option<Resolved>, VoltError> {
        let id = self.registry.read().current_period_id(now);
        if id == NO_PERIOD {
            return Ok(None);
        }
        self.resolve(id).map(Some)
    }

    fn lba_accrual_start(&self, earliest: Option<u64>, period: &Period) -> Result<u64, VoltError> {
        Ok(match self.config.lba_accrual_start {
            LbaAccrualStart::EarliestPeriod => earliest.unwrap_or(period.start_time),
            LbaAccrualStart::At(ts) => ts,
            LbaAccrualStart::AuctionRelease => self.accrual.release_time()?,
        })
    }
}

fn ensure_account(account: &Address) -> Result<(), EnergyError> {
    if account.is_zero() {
        return Err(EnergyError::InvalidInput);
    }
    Ok(())
}
