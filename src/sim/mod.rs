//! Simulation core for workday battery/thermal modeling.
//!
//! # Overview
//!
//! - [`SimulationConfig`]: validated, immutable simulation parameters
//! - [`WorkdayWindow`]: the fixed calendar interval with its break sub-interval
//! - [`relaxation`]: the four pure exponential relaxation models
//! - [`thermal_cap`]: cap-and-latch policy for discharge temperature
//! - [`scheduler`]: the phase state machine producing a [`TimeSeries`]
//! - [`SimError`]: error types for configuration validation
//!
//! All validation happens before the scheduling loop runs; once started, the
//! simulation is a pure deterministic computation and cannot fail.

pub mod config;
pub mod relaxation;
pub mod scheduler;
pub mod thermal_cap;

pub use config::{SimulationConfig, WorkdayWindow};
pub use scheduler::{simulate, Phase, TimeSeries};

use std::fmt;

/// Errors produced while building or validating simulation inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A configuration field holds a value the models cannot accept.
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// A required key was absent from a parameter mapping.
    MissingField(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidField { field, reason } => {
                write!(f, "Invalid configuration field '{}': {}", field, reason)
            }
            SimError::MissingField(key) => {
                write!(f, "Missing required parameter '{}'", key)
            }
        }
    }
}

impl std::error::Error for SimError {}
