//! Engine error taxonomy
//!
//! Only caller contract violations surface as errors. Missing profiles,
//! unknown scenarios, and duplicate staging all degrade locally.

use thiserror::Error;

/// Errors returned by the scoring and simulation entry points
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A caller passed an argument outside the operation's contract
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A cooperative cancellation flag was raised mid-simulation
    #[error("simulation cancelled after {completed} of {requested} trials")]
    Cancelled { completed: usize, requested: usize },

    /// A weight profile failed edit-time validation
    #[error("invalid weight profile '{key}': {reason}")]
    InvalidProfile { key: String, reason: String },
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
