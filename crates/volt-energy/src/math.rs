//! Time-weighted balance integrals and rate application.
//!
//! Pure computation. No collaborators, no IO. Volumes (`balance × seconds`)
//! and the rate product are carried in 256-bit intermediates so that
//! 18-decimal balances times 18-decimal rates never wrap; only the final
//! narrowing to `u128` can fail.

use primitive_types::U256;
use volt_core::constants::{RATE_PRECISION, SECONDS_PER_DAY};
use volt_core::error::EnergyError;
use volt_core::types::{Period, StakeEvent};

/// End of the accrual window for `period` as seen at `now`.
///
/// Returns `None` when nothing can have accrued yet: `now` precedes the
/// period start, or the clamped end does not pass the start.
/// Past `end_time` the window is frozen at `end_time`.
pub fn accrual_window_end(period: &Period, now: u64) -> Option<u64> {
    if now < period.start_time {
        return None;
    }
    let end = now.min(period.end_time);
    (end > period.start_time).then_some(end)
}

/// `Σ balance × duration` over the events inside `[window_start, window_end]`.
///
/// Each in-window event's balance is held until the next event, and the last
/// one until `window_end`. Time before the first in-window event contributes
/// nothing, and events outside the window are ignored.
pub fn balance_volume(
    events: &[StakeEvent],
    window_start: u64,
    window_end: u64,
) -> Result<U256, EnergyError> {
    if window_end <= window_start {
        return Ok(U256::zero());
    }

    let mut volume = U256::zero();
    let mut held: Option<StakeEvent> = None;

    for event in events
        .iter()
        .filter(|e| e.timestamp >= window_start && e.timestamp <= window_end)
    {
        if let Some(prev) = held {
            volume = add_segment(volume, prev.balance, event.timestamp.saturating_sub(prev.timestamp))?;
        }
        held = Some(*event);
    }

    if let Some(last) = held {
        volume = add_segment(volume, last.balance, window_end - last.timestamp)?;
    }

    Ok(volume)
}

/// Volume for a constant `balance` held over `[accrual_start, window_end)`.
pub fn lba_volume(balance: u128, accrual_start: u64, window_end: u64) -> Result<U256, EnergyError> {
    if balance == 0 || window_end <= accrual_start {
        return Ok(U256::zero());
    }
    add_segment(U256::zero(), balance, window_end - accrual_start)
}

/// Convert a volume into energy: `volume × rate / (RATE_PRECISION × SECONDS_PER_DAY)`.
pub fn apply_rate(volume: U256, rate: u128) -> Result<u128, EnergyError> {
    if volume.is_zero() || rate == 0 {
        return Ok(0);
    }
    let scaled = volume
        .checked_mul(U256::from(rate))
        .ok_or(EnergyError::ArithmeticOverflow)?;
    let denominator = U256::from(RATE_PRECISION) * U256::from(SECONDS_PER_DAY);
    narrow(scaled / denominator)
}

/// Energy per day for a balance held constant at `rate`.
pub fn daily_rate(balance: u128, rate: u128) -> Result<u128, EnergyError> {
    narrow(U256::from(balance) * U256::from(rate) / U256::from(RATE_PRECISION))
}

/// Produced minus consumed, floored at zero.
pub fn available(produced: u128, consumed: u128) -> u128 {
    produced.saturating_sub(consumed)
}

fn add_segment(volume: U256, balance: u128, duration: u64) -> Result<U256, EnergyError> {
    // u128 × u64 always fits in 192 bits.
    let segment = U256::from(balance) * U256::from(duration);
    volume
        .checked_add(segment)
        .ok_or(EnergyError::ArithmeticOverflow)
}

fn narrow(value: U256) -> Result<u128, EnergyError> {
    if value.bits() > 128 {
        return Err(EnergyError::ArithmeticOverflow);
    }
    Ok(value.low_u128())
}
