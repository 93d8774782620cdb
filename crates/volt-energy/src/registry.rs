//! Period registry: id-indexed production cycles.
//!
//! Periods are stored by value in registration order; id `n` lives at index
//! `n - 1`. Ids are never reused or decremented. The registry performs no
//! overlap or chronology validation: periods may overlap, leave gaps, or be
//! registered out of order, and lookups by time return the first match in
//! registration order.
//!
//! Not thread-safe on its own. The [`EnergyManager`](crate::EnergyManager)
//! wraps it in a `RwLock`.

use tracing::info;
use volt_core::constants::NO_PERIOD;
use volt_core::error::EnergyError;
use volt_core::types::{Period, PeriodId};

#[derive(Debug, Clone, Default)]
pub struct PeriodRegistry {
    periods: Vec<Period>,
}

impl PeriodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a period and return its id.
    ///
    /// # Errors
    ///
    /// - [`EnergyError::InvalidPeriodWindow`] if `start_time >= end_time`
    pub fn add_period(&mut self, period: Period) -> Result<PeriodId, EnergyError> {
        check_window(&period)?;
        self.periods.push(period);
        let id = self.period_count();
        info!(
            period_id = id,
            start = period.start_time,
            end = period.end_time,
            "registry: period added"
        );
        Ok(id)
    }

    /// Append several periods, returning their ids in order.
    ///
    /// Every window is validated before any period is appended, so a rejected
    /// batch leaves the registry untouched.
    pub fn add_periods(&mut self, periods: &[Period]) -> Result<Vec<PeriodId>, EnergyError> {
        periods.iter().try_for_each(check_window)?;
        periods.iter().map(|p| self.add_period(*p)).collect()
    }

    /// Overwrite the period at `id` in place. Its id and position are kept.
    ///
    /// # Errors
    ///
    /// - [`EnergyError::InvalidPeriod`] if `id` is 0 or beyond the highest assigned id
    /// - [`EnergyError::InvalidPeriodWindow`] if `start_time >= end_time`
    pub fn update_period(&mut self, id: PeriodId, period: Period) -> Result<(), EnergyError> {
        let index = self.index_of(id)?;
        check_window(&period)?;
        self.periods[index] = period;
        info!(
            period_id = id,
            start = period.start_time,
            end = period.end_time,
            "registry: period updated"
        );
        Ok(())
    }

    /// The period at `id`.
    ///
    /// # Errors
    ///
    /// - [`EnergyError::InvalidPeriod`] if `id` is 0 or beyond the highest assigned id
    pub fn get_period(&self, id: PeriodId) -> Result<Period, EnergyError> {
        self.index_of(id).map(|i| self.periods[i])
    }

    /// Id of the first period (in registration order) whose window contains
    /// `now`, or [`NO_PERIOD`] if none does.
    pub fn current_period_id(&self, now: u64) -> PeriodId {
        self.periods()
            .find(|(_, p)| p.contains(now))
            .map_or(NO_PERIOD, |(id, _)| id)
    }

    /// The period containing `now`, or `Period::default()` when none does.
    ///
    /// Callers must check [`current_period_id`](Self::current_period_id)
    /// before trusting the returned rates.
    pub fn current_period(&self, now: u64) -> Period {
        match self.current_period_id(now) {
            NO_PERIOD => Period::default(),
            id => self.periods[id as usize - 1],
        }
    }

    /// Highest assigned id (equals the number of registered periods).
    pub fn period_count(&self) -> u64 {
        self.periods.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Earliest `start_time` across all registered periods.
    pub fn earliest_start(&self) -> Option<u64> {
        self.periods.iter().map(|p| p.start_time).min()
    }

    /// All periods with their ids, in registration order.
    pub fn periods(&self) -> impl Iterator<Item = (PeriodId, &Period)> {
        self.periods
            .iter()
            .enumerate()
            .map(|(i, p)| (i as PeriodId + 1, p))
    }

    fn index_of(&self, id: PeriodId) -> Result<usize, EnergyError> {
        if id == NO_PERIOD || id > self.period_count() {
            return Err(EnergyError::InvalidPeriod(id));
        }
        Ok(id as usize - 1)
    }
}

fn check_window(period: &Period) -> Result<(), EnergyError> {
    if !period.has_valid_window() {
        return Err(EnergyError::InvalidPeriodWindow {
            start: period.start_time,
            end: period.end_time,
        });
    }
    Ok(())
}
