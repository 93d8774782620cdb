//! In-memory implementations of the collaborator traits.
//!
//! Everything lives in `HashMap`s behind `parking_lot` locks with no
//! persistence. Suitable for tests, simulations and embedding in a host that
//! mirrors external state into memory.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::error::{EnergyError, VoltError};
use crate::traits::{AccessControl, AuctionOracle, CounterStore, HistoryProvider};
use crate::types::{Address, StakeEvent, TokenClass};

// ---------------------------------------------------------------------------
// MemoryHistory
// ---------------------------------------------------------------------------

/// Stake histories keyed by `(token class, account)`, kept sorted by timestamp.
#[derive(Default)]
pub struct MemoryHistory {
    events: RwLock<HashMap<(TokenClass, Address), Vec<StakeEvent>>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `account`'s `class` balance became `balance` at `timestamp`.
    ///
    /// Out-of-order inserts are placed after any event with an equal or
    /// earlier timestamp, so the sequence stays time-ordered.
    pub fn record(&self, class: TokenClass, account: Address, timestamp: u64, balance: u128) {
        let mut events = self.events.write();
        let seq = events.entry((class, account)).or_default();
        let pos = seq.partition_point(|e| e.timestamp <= timestamp);
        seq.insert(pos, StakeEvent::new(timestamp, balance));
    }

    /// Number of events recorded for `(class, account)`.
    pub fn event_count(&self, class: TokenClass, account: &Address) -> usize {
        self.events
            .read()
            .get(&(class, *account))
            .map_or(0, Vec::len)
    }
}

impl HistoryProvider for MemoryHistory {
    fn history(
        &self,
        class: TokenClass,
        account: &Address,
        up_to: u64,
    ) -> Result<Vec<StakeEvent>, VoltError> {
        let events = self.events.read();
        let Some(seq) = events.get(&(class, *account)) else {
            return Ok(Vec::new());
        };
        let end = seq.partition_point(|e| e.timestamp <= up_to);
        Ok(seq[..end].to_vec())
    }
}

// ---------------------------------------------------------------------------
// MemoryAuction
// ---------------------------------------------------------------------------

/// Claimable auction liquidity per account plus a global release time.
pub struct MemoryAuction {
    claimable: RwLock<HashMap<Address, u128>>,
    release_time: RwLock<u64>,
}

impl MemoryAuction {
    pub fn new(release_time: u64) -> Self {
        Self {
            claimable: RwLock::new(HashMap::new()),
            release_time: RwLock::new(release_time),
        }
    }

    /// Overwrite the claimable amount for `account`.
    pub fn set_claimable(&self, account: Address, amount: u128) {
        self.claimable.write().insert(account, amount);
    }

    /// Simulate a full withdrawal: claimable drops to zero.
    pub fn withdraw_all(&self, account: &Address) {
        self.claimable.write().insert(*account, 0);
    }

    pub fn set_release_time(&self, release_time: u64) {
        *self.release_time.write() = release_time;
    }
}

impl AuctionOracle for MemoryAuction {
    fn claimable_lp_amount(&self, account: &Address) -> Result<u128, VoltError> {
        Ok(self.claimable.read().get(account).copied().unwrap_or(0))
    }

    fn lp_token_release_time(&self) -> Result<u64, VoltError> {
        Ok(*self.release_time.read())
    }
}

// ---------------------------------------------------------------------------
// MemoryCounterStore
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Counters {
    consumed: u128,
    earned: u128,
}

/// Monotonic consumed/earned counters for one pool.
#[derive(Default)]
pub struct MemoryCounterStore {
    counters: RwLock<HashMap<Address, Counters>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts with any recorded counter.
    pub fn account_count(&self) -> usize {
        self.counters.read().len()
    }
}

impl CounterStore for MemoryCounterStore {
    fn increase_consumed_amount(&self, account: &Address, delta: u128) -> Result<(), VoltError> {
        let mut counters = self.counters.write();
        let entry = counters.entry(*account).or_default();
        entry.consumed = entry
            .consumed
            .checked_add(delta)
            .ok_or(EnergyError::ArithmeticOverflow)?;
        Ok(())
    }

    fn revert_consumed_amount(&self, account: &Address, delta: u128) -> Result<(), VoltError> {
        let mut counters = self.counters.write();
        let Some(entry) = counters.get_mut(account) else {
            return match delta {
                0 => Ok(()),
                _ => Err(EnergyError::ArithmeticOverflow.into()),
            };
        };
        entry.consumed = entry
            .consumed
            .checked_sub(delta)
            .ok_or(EnergyError::ArithmeticOverflow)?;
        Ok(())
    }

    fn increase_earned_amount(&self, account: &Address, delta: u128) -> Result<(), VoltError> {
        let mut counters = self.counters.write();
        let entry = counters.entry(*account).or_default();
        entry.earned = entry
            .earned
            .checked_add(delta)
            .ok_or(EnergyError::ArithmeticOverflow)?;
        Ok(())
    }

    fn consumed_amount(&self, account: &Address) -> Result<u128, VoltError> {
        Ok(self.counters.read().get(account).map_or(0, |c| c.consumed))
    }

    fn earned_amount(&self, account: &Address) -> Result<u128, VoltError> {
        Ok(self.counters.read().get(account).map_or(0, |c| c.earned))
    }
}

// ---------------------------------------------------------------------------
// MemoryAccessControl
// ---------------------------------------------------------------------------

/// Fixed manager set and a mutable consumer allow-list.
#[derive(Default)]
pub struct MemoryAccessControl {
    managers: RwLock<HashSet<Address>>,
    consumers: RwLock<HashSet<Address>>,
}

impl MemoryAccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access control with a single manager.
    pub fn with_manager(manager: Address) -> Self {
        let ac = Self::new();
        ac.add_manager(manager);
        ac
    }

    pub fn add_manager(&self, manager: Address) {
        self.managers.write().insert(manager);
    }
}

impl AccessControl for MemoryAccessControl {
    fn is_manager(&self, address: &Address) -> bool {
        self.managers.read().contains(address)
    }

    fn is_authorized_consumer(&self, address: &Address) -> bool {
        self.consumers.read().contains(address)
    }

    fn grant_consumer(&self, address: &Address) {
        self.consumers.write().insert(*address);
    }

    fn revoke_consumer(&self, address: &Address) {
        self.consumers.write().remove(address);
    }
}
