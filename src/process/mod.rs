/*!
 * Process Module
 * Process registration, schedule validation and queue ordering
 */

pub mod jitter;
pub mod queue;
pub mod registry;
pub mod types;
pub mod validation;

// Re-export for convenience
pub use jitter::{JitterSource, NoJitter, SeededJitter};
pub use queue::SchedulingQueue;
pub use registry::{Process, ProcessRegistry};
pub use types::{
    FrequencyClass, Priority, ProcessSpec, ProcessState, ProcessStats, ProcessView, Suspension,
    Work,
};
pub use validation::TickSchedule;
