/*!
 * Scheduler Limits and Constants
 *
 * Centralized location for escalation thresholds, health-score weights and
 * configuration defaults. Grouped by the component that consumes them.
 */

use super::types::{Compute, Cycle};

// =============================================================================
// CIRCUIT BREAKER
// =============================================================================

/// Consecutive failures at which a process is suspended with backoff
pub const TRANSIENT_SUSPENSION_STREAK: u32 = 3;

/// Consecutive failures at which the circuit opens permanently
pub const PERMANENT_SUSPENSION_STREAK: u32 = 10;

/// Upper bound on a transient backoff, in cycles
pub const MAX_BACKOFF_CYCLES: Cycle = 1000;

/// Reason recorded for administrative suspension
pub const MANUAL_SUSPENSION_REASON: &str = "suspended by administrator";

// =============================================================================
// HEALTH SCORE
// =============================================================================

pub const HEALTH_MAX: f64 = 100.0;
pub const HEALTH_MIN: f64 = 0.0;

/// Bonus for a success within `RECENT_SUCCESS_WINDOW` cycles
pub const RECENT_SUCCESS_BONUS: f64 = 20.0;

/// Cycles within which a success counts as recent
pub const RECENT_SUCCESS_WINDOW: Cycle = 100;

/// Penalty per consecutive failure
pub const STREAK_PENALTY: f64 = 15.0;

/// Processes below this score are listed as unhealthy in summaries
pub const UNHEALTHY_THRESHOLD: f64 = 50.0;

// =============================================================================
// REGISTRATION
// =============================================================================

/// Relative interval jitter sampled once per registration (±10%)
pub const INTERVAL_JITTER_FRACTION: f64 = 0.10;

// =============================================================================
// CONFIGURATION DEFAULTS
// =============================================================================

pub const DEFAULT_TARGET_UTILIZATION: f64 = 0.9;
pub const DEFAULT_RESERVED_FRACTION: f64 = 0.02;

pub const DEFAULT_RESERVE_CRITICAL: Compute = 500.0;
pub const DEFAULT_RESERVE_LOW: Compute = 2000.0;
pub const DEFAULT_RESERVE_HIGH: Compute = 8000.0;

/// Minimum gap enforced between reserve thresholds on auto-correction
pub const RESERVE_THRESHOLD_STEP: Compute = 1.0;

pub const DEFAULT_OVERRUN_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_OVERRUN_LOG_INTERVAL: Cycle = 10;

pub const DEFAULT_SUMMARY_TOP_N: usize = 5;

pub const DEFAULT_DOMAIN_LOG_FACTOR: f64 = 0.25;
pub const DEFAULT_MAX_DOMAIN_SCALE: f64 = 2.0;
