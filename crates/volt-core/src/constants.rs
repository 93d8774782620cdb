//! Protocol constants. Token amounts and energy are in base units (1 token = 10^18 units).

/// One whole token (and one whole unit of energy) in base units.
pub const COIN: u128 = 1_000_000_000_000_000_000;

/// Fixed-point denominator for period reward rates.
///
/// A rate of `RATE_PRECISION` means one unit of energy per staked unit per day.
pub const RATE_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Seconds in one accrual day. Rates are expressed per day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Reserved period id meaning "no period is active".
pub const NO_PERIOD: u64 = 0;

/// Id assigned to the first registered period.
pub const FIRST_PERIOD_ID: u64 = 1;
