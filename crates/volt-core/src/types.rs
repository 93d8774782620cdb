//! Core domain types: accounts, periods, stake history, auction snapshots.
//!
//! Token amounts and energy are `u128` base units. Timestamps are `u64`
//! Unix seconds. Rates are fixed-point with
//! [`RATE_PRECISION`](crate::constants::RATE_PRECISION) as denominator.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sequential period identifier. `0` is reserved as "no period".
pub type PeriodId = u64;

/// A 20-byte account identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address. Never a valid account.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an Address from a byte array.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address with every byte set to `seed`. Handy for tests and fixtures.
    pub fn repeat(seed: u8) -> Self {
        Self([seed; 20])
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Error parsing an [`Address`] from hex.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAddressError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("invalid length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| ParseAddressError::InvalidHex(e.to_string()))?;
        let arr: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseAddressError::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A production cycle: a half-open time window with per-source reward rates.
///
/// Rates are energy per staked unit per day, in fixed point over
/// [`RATE_PRECISION`](crate::constants::RATE_PRECISION).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Period {
    /// Inclusive start of the window.
    pub start_time: u64,
    /// Exclusive end of the window.
    pub end_time: u64,
    /// Rate applied to primary-token stake.
    pub primary_rate: u128,
    /// Rate applied to LP-token stake.
    pub lp_rate: u128,
    /// Rate applied to claimable auction liquidity.
    pub lba_rate: u128,
}

impl Period {
    pub fn new(start_time: u64, end_time: u64, primary_rate: u128, lp_rate: u128, lba_rate: u128) -> Self {
        Self {
            start_time,
            end_time,
            primary_rate,
            lp_rate,
            lba_rate,
        }
    }

    /// Whether `now` falls inside `[start_time, end_time)`.
    pub fn contains(&self, now: u64) -> bool {
        self.start_time <= now && now < self.end_time
    }

    /// Whether `start_time` strictly precedes `end_time`.
    pub fn has_valid_window(&self) -> bool {
        self.start_time < self.end_time
    }

    /// Rate for a stake token class.
    pub fn rate_for(&self, class: TokenClass) -> u128 {
        match class {
            TokenClass::Primary => self.primary_rate,
            TokenClass::Lp => self.lp_rate,
        }
    }
}

/// A balance snapshot from the stake history: the balance right after a change.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeEvent {
    pub timestamp: u64,
    pub balance: u128,
}

impl StakeEvent {
    pub fn new(timestamp: u64, balance: u128) -> Self {
        Self { timestamp, balance }
    }
}

/// Which staked token a history belongs to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    Primary,
    Lp,
}

/// Independently metered consumption pool.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Pool {
    /// Energy produced by primary and LP stake.
    Regular,
    /// Energy produced by claimable auction liquidity.
    Lba,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => f.write_str("regular"),
            Self::Lba => f.write_str("lba"),
        }
    }
}

/// Live auction state for one account.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AuctionSnapshot {
    /// Liquidity the account can still claim (not yet withdrawn).
    pub claimable_amount: u128,
    /// Global time at which auction liquidity becomes withdrawable.
    pub release_time: u64,
}
