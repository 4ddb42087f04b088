/*!
 * Scheduler Module
 * Admission, execution, health tracking and adaptive budgeting
 */

pub mod admission;
pub mod budget;
pub mod executor;
pub mod health;

// Re-export public API
pub use admission::{is_due, Admission, AdmissionController};
pub use budget::BudgetPlanner;
pub use executor::{Execution, Executor};
pub use health::{escalation_for, health_score, Escalation, HealthTracker, RunContext};
