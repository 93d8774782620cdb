//! # volt-energy: period registry and energy accrual engine.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! Energy is a non-transferable resource produced over time by staked
//! positions:
//! - **Periods**: id-indexed production cycles, each carrying one rate per
//!   energy source. Rates are scaled by [`RATE_PRECISION`](volt_core::constants::RATE_PRECISION).
//! - **Stake accrual**: primary and LP production integrate the account's
//!   balance history over the elapsed part of the period, in day units.
//! - **LBA accrual**: liquidity still claimable from the bootstrapping
//!   auction accrues as a constant balance, read live on every call.
//! - **Consumption**: spends drain the LBA pool first; the regular pool
//!   absorbs the rest.

pub mod accrual;
pub mod allocator;
pub mod config;
pub mod manager;
pub mod math;
pub mod registry;

pub use accrual::{AccrualEngine, EnergyBreakdown};
pub use allocator::{ConsumptionAllocator, ConsumptionSplit, split_consumption};
pub use config::{EngineConfig, LbaAccrualStart};
pub use manager::{Collaborators, EnergyManager};
pub use registry::PeriodRegistry;
