//! Scenario and adversarial test suite for the Volt energy engine.
//!
//! This crate contains integration tests that drive a fully wired
//! [`EnergyManager`](volt_energy::EnergyManager) through the public API only,
//! with in-memory collaborators standing in for the staking history, auction
//! and counter stores.

pub mod helpers;
