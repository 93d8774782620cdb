//! Engine configuration, fixed when the [`EnergyManager`](crate::EnergyManager)
//! is constructed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// When auction liquidity starts accruing LBA energy.
///
/// The effective start inside a period is always
/// `max(period.start_time, resolved accrual start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LbaAccrualStart {
    /// The earliest registered period's start.
    #[default]
    EarliestPeriod,
    /// A fixed Unix timestamp.
    At(u64),
    /// The auction's global liquidity release time.
    AuctionRelease,
}

impl FromStr for LbaAccrualStart {
    type Err = String;

    /// Parses `earliest`, `release`, or a Unix timestamp.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earliest" | "earliest_period" => Ok(Self::EarliestPeriod),
            "release" | "auction_release" => Ok(Self::AuctionRelease),
            other => other
                .parse::<u64>()
                .map(Self::At)
                .map_err(|_| format!("expected 'earliest', 'release' or a timestamp, got '{other}'")),
        }
    }
}

/// Configuration for an energy engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Where LBA accrual begins.
    pub lba_accrual_start: LbaAccrualStart,
}

impl EngineConfig {
    pub fn with_lba_accrual_start(lba_accrual_start: LbaAccrualStart) -> Self {
        Self { lba_accrual_start }
    }
}
