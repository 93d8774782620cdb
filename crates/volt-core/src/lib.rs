//! # volt-core
//! Foundation types, errors and collaborator traits for the Volt energy engine.

pub mod clock;
pub mod constants;
pub mod error;
pub mod memory;
pub mod traits;
pub mod types;
