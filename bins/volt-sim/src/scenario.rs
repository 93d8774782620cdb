//! JSON scenario format and replay.
//!
//! A scenario registers periods, seeds staking history and auction state,
//! then walks a list of steps against a [`ManualClock`]. Reads produce
//! [`Outcome`]s; failed spends are reported rather than aborting the run.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use volt_core::clock::ManualClock;
use volt_core::constants::NO_PERIOD;
use volt_core::memory::{MemoryAccessControl, MemoryAuction, MemoryCounterStore, MemoryHistory};
use volt_core::traits::Clock;
use volt_core::types::{Address, Period, PeriodId, TokenClass};
use volt_energy::{Collaborators, ConsumptionSplit, EnergyBreakdown, EnergyManager, EngineConfig};

/// Address the simulator acts as. It is both manager and consumer.
pub const OPERATOR: Address = Address([0x01; 20]);

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: EngineConfig,
    /// Clock value before the first step.
    pub start_time: u64,
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub history: Vec<StakeRecord>,
    #[serde(default)]
    pub auction: AuctionSetup,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StakeRecord {
    pub class: TokenClass,
    pub account: Address,
    pub timestamp: u64,
    pub balance: u128,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuctionSetup {
    #[serde(default)]
    pub release_time: u64,
    #[serde(default)]
    pub claimable: Vec<Claimable>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Claimable {
    pub account: Address,
    pub amount: u128,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Move the clock forward by this many seconds.
    Advance(u64),
    /// Set the clock to an absolute timestamp.
    SetTime(u64),
    Stake(StakeRecord),
    SetClaimable(Claimable),
    Withdraw { account: Address },
    UseEnergy {
        account: Address,
        period_id: PeriodId,
        amount: u128,
    },
    /// Report `account`'s energy for `period_id`, or for the active period.
    Report {
        account: Address,
        #[serde(default)]
        period_id: Option<PeriodId>,
    },
}

/// What a step produced, printed as one JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Consumed {
        time: u64,
        account: Address,
        period_id: PeriodId,
        split: ConsumptionSplit,
    },
    Rejected {
        time: u64,
        account: Address,
        period_id: PeriodId,
        error: String,
    },
    Report(Report),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub time: u64,
    pub account: Address,
    /// `0` when no period was requested and none is active.
    pub period_id: PeriodId,
    pub produced: EnergyBreakdown,
    pub available_regular: u128,
    pub available_lba: u128,
    pub consumed_regular: u128,
    pub consumed_lba: u128,
    pub daily_production: u128,
}

/// Read and parse a scenario file.
pub fn load(path: &Path) -> Result<Scenario> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid scenario {}", path.display()))
}

/// A wired engine plus the handles the replay drives directly.
struct Sim {
    manager: EnergyManager,
    history: Arc<MemoryHistory>,
    auction: Arc<MemoryAuction>,
    clock: Arc<ManualClock>,
}

impl Sim {
    fn new(scenario: &Scenario) -> Result<Self> {
        let history = Arc::new(MemoryHistory::new());
        let auction = Arc::new(MemoryAuction::new(scenario.auction.release_time));
        let clock = Arc::new(ManualClock::new(scenario.start_time));

        let manager = EnergyManager::new(
            scenario.config,
            Collaborators {
                history: history.clone(),
                auction: auction.clone(),
                regular_counters: Arc::new(MemoryCounterStore::new()),
                lba_counters: Arc::new(MemoryCounterStore::new()),
                access: Arc::new(MemoryAccessControl::with_manager(OPERATOR)),
                clock: clock.clone(),
            },
        );
        manager.add_consumer(&OPERATOR, &OPERATOR)?;
        manager
            .add_periods(&OPERATOR, &scenario.periods)
            .context("period registration failed")?;

        for r in &scenario.history {
            history.record(r.class, r.account, r.timestamp, r.balance);
        }
        for c in &scenario.auction.claimable {
            auction.set_claimable(c.account, c.amount);
        }

        Ok(Self {
            manager,
            history,
            auction,
            clock,
        })
    }

    fn step(&self, step: &Step) -> Result<Option<Outcome>> {
        let now = self.clock.now();
        match *step {
            Step::Advance(secs) => self.clock.advance(secs),
            Step::SetTime(ts) => self.clock.set(ts),
            Step::Stake(r) => self.history.record(r.class, r.account, r.timestamp, r.balance),
            Step::SetClaimable(c) => self.auction.set_claimable(c.account, c.amount),
            Step::Withdraw { account } => self.auction.withdraw_all(&account),
            Step::UseEnergy {
                account,
                period_id,
                amount,
            } => {
                let outcome = match self.manager.use_energy(&OPERATOR, &account, period_id, amount) {
                    Ok(split) => Outcome::Consumed {
                        time: now,
                        account,
                        period_id,
                        split,
                    },
                    Err(e) => {
                        warn!(%account, period_id, error = %e, "sim: spend rejected");
                        Outcome::Rejected {
                            time: now,
                            account,
                            period_id,
                            error: e.to_string(),
                        }
                    }
                };
                return Ok(Some(outcome));
            }
            Step::Report { account, period_id } => {
                return self.report(account, period_id).map(|r| Some(Outcome::Report(r)));
            }
        }
        Ok(None)
    }

    fn report(&self, account: Address, period_id: Option<PeriodId>) -> Result<Report> {
        let m = &self.manager;
        let id = period_id.unwrap_or_else(|| m.current_period_id());
        let (produced, available_regular, available_lba) = if id == NO_PERIOD {
            (EnergyBreakdown::default(), 0, 0)
        } else {
            (
                m.production_breakdown(&account, id)?,
                m.calculate_available_energy(&account, id)?,
                m.calculate_available_lba_energy(&account, id)?,
            )
        };
        Ok(Report {
            time: self.clock.now(),
            account,
            period_id: id,
            produced,
            available_regular,
            available_lba,
            consumed_regular: m.get_consumed_energy(&account)?,
            consumed_lba: m.get_consumed_lba_energy(&account)?,
            daily_production: m.daily_energy_production(&account)?,
        })
    }
}

/// Replay `scenario` from the start and collect every outcome in step order.
pub fn run(scenario: &Scenario) -> Result<Vec<Outcome>> {
    let sim = Sim::new(scenario)?;
    info!(
        periods = scenario.periods.len(),
        events = scenario.history.len(),
        steps = scenario.steps.len(),
        "sim: scenario loaded"
    );

    let mut outcomes = Vec::new();
    for (i, step) in scenario.steps.iter().enumerate() {
        debug!(index = i, ?step, "sim: step");
        if let Some(outcome) = sim
            .step(step)
            .with_context(|| format!("step {i} failed"))?
        {
            outcomes.push(outcome);
        }
    }
    Ok(outcomes)
}
