//! Trait interfaces for the external collaborators of the energy engine.
//!
//! These traits define the contracts between the engine and the outside world:
//! - [`HistoryProvider`]: stake balance history per token class
//! - [`AuctionOracle`]: live claimable auction liquidity
//! - [`CounterStore`]: monotonic consumed/earned counters, one per pool
//! - [`AccessControl`]: manager and consumer roles
//! - [`Clock`]: the current time
//!
//! In-memory implementations live in [`memory`](crate::memory).

use crate::error::VoltError;
use crate::types::{Address, AuctionSnapshot, StakeEvent, TokenClass};

/// Read-only access to an account's stake balance history.
///
/// Implemented by the staking position tracker.
pub trait HistoryProvider: Send + Sync {
    /// Time-ordered balance snapshots for `account` in `class`.
    ///
    /// Must never return an event with `timestamp > up_to`.
    fn history(
        &self,
        class: TokenClass,
        account: &Address,
        up_to: u64,
    ) -> Result<Vec<StakeEvent>, VoltError>;
}

/// Live view of the liquidity bootstrap auction.
pub trait AuctionOracle: Send + Sync {
    /// Liquidity `account` can still claim. Zero once fully withdrawn.
    fn claimable_lp_amount(&self, account: &Address) -> Result<u128, VoltError>;

    /// Global time at which auction liquidity becomes withdrawable.
    fn lp_token_release_time(&self) -> Result<u64, VoltError>;

    /// Both values as one snapshot.
    ///
    /// Default implementation calls the two accessors in turn.
    fn snapshot(&self, account: &Address) -> Result<AuctionSnapshot, VoltError> {
        Ok(AuctionSnapshot {
            claimable_amount: self.claimable_lp_amount(account)?,
            release_time: self.lp_token_release_time()?,
        })
    }
}

/// Per-account monotonic counters for one consumption pool.
///
/// Counters only ever increase once a spend commits. The engine keeps one
/// instance per pool.
pub trait CounterStore: Send + Sync {
    /// Add `delta` to the consumed counter of `account`.
    fn increase_consumed_amount(&self, account: &Address, delta: u128) -> Result<(), VoltError>;

    /// Undo an `increase_consumed_amount(account, delta)` made by the same
    /// spend, when the other pool's write failed.
    fn revert_consumed_amount(&self, account: &Address, delta: u128) -> Result<(), VoltError>;

    /// Add `delta` to the earned counter of `account`.
    fn increase_earned_amount(&self, account: &Address, delta: u128) -> Result<(), VoltError>;

    /// Current consumed counter of `account`. Zero if never touched.
    fn consumed_amount(&self, account: &Address) -> Result<u128, VoltError>;

    /// Current earned counter of `account`. Zero if never touched.
    fn earned_amount(&self, account: &Address) -> Result<u128, VoltError>;
}

/// Role registry gating mutating operations.
pub trait AccessControl: Send + Sync {
    /// Whether `address` may mutate the period registry and administer consumers.
    fn is_manager(&self, address: &Address) -> bool;

    /// Whether `address` is on the consumer allow-list.
    fn is_authorized_consumer(&self, address: &Address) -> bool;

    /// Add `address` to the consumer allow-list. Idempotent.
    fn grant_consumer(&self, address: &Address);

    /// Remove `address` from the consumer allow-list. Idempotent.
    fn revoke_consumer(&self, address: &Address);
}

/// Source of the current time in Unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}
