/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed fixed-phase schedule, raised synchronously at registration
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ScheduleValidationError {
    #[error("tick modulo must be non-negative, got {0}")]
    #[diagnostic(
        code(schedule::negative_modulo),
        help("Use 0 to disable fixed-phase scheduling, or a positive cycle count.")
    )]
    NegativeModulo(i64),

    #[error("tick offset must be non-negative, got {0}")]
    #[diagnostic(
        code(schedule::negative_offset),
        help("Offsets are counted in cycles from the phase origin.")
    )]
    NegativeOffset(i64),

    #[error("tick offset {offset} must be smaller than tick modulo {modulo}")]
    #[diagnostic(
        code(schedule::offset_out_of_range),
        help("Pick an offset in 0..modulo; larger offsets alias a smaller phase.")
    )]
    OffsetOutOfRange { offset: i64, modulo: i64 },
}

/// Contained failure of a work callback
///
/// Never propagates out of `run()`; recorded in the process error counters.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum WorkError {
    #[error("work failed: {0}")]
    #[diagnostic(code(work::failed))]
    Failed(String),

    #[error("work panicked: {0}")]
    #[diagnostic(
        code(work::panicked),
        help("Panics are contained by the executor and counted as failures.")
    )]
    Panicked(String),
}

impl WorkError {
    /// Build from an `anyhow` error, keeping the full context chain
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        WorkError::Failed(format!("{:#}", err))
    }
}

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    #[diagnostic(
        code(config::parse),
        help("Configuration is JSON; unknown keys are rejected.")
    )]
    Parse(String),

    #[error("failed to read configuration: {0}")]
    #[diagnostic(code(config::io))]
    Io(String),

    #[error("invalid configuration value: {0}")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

/// Unified kernel error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error("Schedule validation error: {0}")]
    #[diagnostic(transparent)]
    Schedule(#[from] ScheduleValidationError),

    #[error("Work error: {0}")]
    #[diagnostic(transparent)]
    Work(#[from] WorkError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Process {0} not found")]
    #[diagnostic(
        code(kernel::process_not_found),
        help("The process may have been unregistered or never existed.")
    )]
    ProcessNotFound(String),
}
