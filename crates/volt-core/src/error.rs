//! Error types for the Volt energy engine.
use thiserror::Error;

use crate::types::PeriodId;

/// Role a caller must hold for a gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// May mutate the period registry, manage consumers and record earned energy.
    Manager,
    /// May spend energy on behalf of accounts.
    Consumer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manager => f.write_str("manager"),
            Self::Consumer => f.write_str("consumer"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnergyError {
    #[error("invalid input: zero address")] InvalidInput,
    #[error("invalid period: {0}")] InvalidPeriod(PeriodId),
    #[error("unauthorized: {caller} lacks {role} role")] Unauthorized { caller: String, role: Role },
    #[error("invalid period window: start {start} must precede end {end}")] InvalidPeriodWindow { start: u64, end: u64 },
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("collaborator unavailable: {0}")] Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoltError {
    #[error(transparent)] Energy(#[from] EnergyError),
    #[error(transparent)] Collaborator(#[from] CollaboratorError),
}

impl VoltError {
    /// The underlying engine error, if this is one.
    pub fn as_energy(&self) -> Option<&EnergyError> {
        match self {
            Self::Energy(e) => Some(e),
            Self::Collaborator(_) => None,
        }
    }
}
