//! Accrual engine: per-source energy production for one account in one period.
//!
//! Stake sources integrate the account's balance history; the LBA source
//! treats the *live* claimable auction amount as a constant balance. Nothing
//! is cached: every call reads the collaborators afresh, so a withdrawal
//! retroactively zeroes LBA production for all later reads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;
use volt_core::error::{EnergyError, VoltError};
use volt_core::traits::{AuctionOracle, HistoryProvider};
use volt_core::types::{Address, Period, TokenClass};

use crate::math;

/// Energy produced by each source within one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnergyBreakdown {
    pub primary: u128,
    pub lp: u128,
    pub lba: u128,
}

impl EnergyBreakdown {
    /// Production feeding the regular pool (`primary + lp`).
    pub fn regular(&self) -> Result<u128, EnergyError> {
        self.primary
            .checked_add(self.lp)
            .ok_or(EnergyError::ArithmeticOverflow)
    }
}

pub struct AccrualEngine {
    history: Arc<dyn HistoryProvider>,
    auction: Arc<dyn AuctionOracle>,
}

impl AccrualEngine {
    pub fn new(history: Arc<dyn HistoryProvider>, auction: Arc<dyn AuctionOracle>) -> Self {
        Self { history, auction }
    }

    /// Energy produced by `account`'s stake in `class` during `period`, as of `now`.
    pub fn stake_energy(
        &self,
        class: TokenClass,
        account: &Address,
        period: &Period,
        now: u64,
    ) -> Result<u128, VoltError> {
        let Some(window_end) = math::accrual_window_end(period, now) else {
            return Ok(0);
        };
        let events = self.history.history(class, account, period.end_time)?;
        let volume = math::balance_volume(&events, period.start_time, window_end)?;
        let energy = math::apply_rate(volume, period.rate_for(class))?;
        trace!(%account, ?class, events = events.len(), energy, "accrual: stake energy");
        Ok(energy)
    }

    /// Energy produced by `account`'s claimable auction liquidity during
    /// `period`, accruing from `max(period.start_time, accrual_start)`.
    pub fn lba_energy(
        &self,
        account: &Address,
        period: &Period,
        now: u64,
        accrual_start: u64,
    ) -> Result<u128, VoltError> {
        let Some(window_end) = math::accrual_window_end(period, now) else {
            return Ok(0);
        };
        let claimable = self.auction.claimable_lp_amount(account)?;
        if claimable == 0 {
            return Ok(0);
        }
        let start = period.start_time.max(accrual_start);
        let volume = math::lba_volume(claimable, start, window_end)?;
        let energy = math::apply_rate(volume, period.lba_rate)?;
        trace!(%account, claimable, start, window_end, energy, "accrual: lba energy");
        Ok(energy)
    }

    /// All three sources at once.
    pub fn breakdown(
        &self,
        account: &Address,
        period: &Period,
        now: u64,
        lba_accrual_start: u64,
    ) -> Result<EnergyBreakdown, VoltError> {
        Ok(EnergyBreakdown {
            primary: self.stake_energy(TokenClass::Primary, account, period, now)?,
            lp: self.stake_energy(TokenClass::Lp, account, period, now)?,
            lba: self.lba_energy(account, period, now, lba_accrual_start)?,
        })
    }

    /// Latest recorded stake balance at or before `now`. Zero with no history.
    pub fn stake_balance(&self, class: TokenClass, account: &Address, now: u64) -> Result<u128, VoltError> {
        Ok(self
            .history
            .history(class, account, now)?
            .last()
            .map_or(0, |e| e.balance))
    }

    /// Energy per day the current stake in `class` would accrue under `period`.
    pub fn daily_stake_production(
        &self,
        class: TokenClass,
        account: &Address,
        period: &Period,
        now: u64,
    ) -> Result<u128, VoltError> {
        let balance = self.stake_balance(class, account, now)?;
        Ok(math::daily_rate(balance, period.rate_for(class))?)
    }

    /// Energy per day the live claimable liquidity would accrue under `period`.
    ///
    /// Zero before `accrual_start`.
    pub fn daily_lba_production(
        &self,
        account: &Address,
        period: &Period,
        now: u64,
        accrual_start: u64,
    ) -> Result<u128, VoltError> {
        if now < accrual_start {
            return Ok(0);
        }
        let claimable = self.auction.claimable_lp_amount(account)?;
        Ok(math::daily_rate(claimable, period.lba_rate)?)
    }

    /// The auction's global release time.
    pub fn release_time(&self) -> Result<u64, VoltError> {
        self.auction.lp_token_release_time()
    }
}
