/*!
 * Cycle Kernel Library
 * Cooperative per-cycle process scheduler exposed as a library
 */

pub mod config;
pub mod core;
pub mod host;
pub mod kernel;
pub mod monitoring;
pub mod process;
pub mod scheduler;

// Re-exports
pub use config::{KernelConfig, ReserveStatus, ReserveThresholds};
pub use crate::core::{
    Compute, ConfigError, Cycle, KernelError, KernelResult, ProcessId, ScheduleValidationError,
    WorkError,
};
pub use host::{Host, SimulatedHost};
pub use kernel::{CycleReport, Kernel, KernelBuilder, KernelSummary};
pub use monitoring::{init_tracing, Notification, NotificationSink, RecordingSink};
pub use process::{
    FrequencyClass, NoJitter, Priority, ProcessSpec, ProcessState, ProcessStats, ProcessView,
    SeededJitter, Suspension,
};
