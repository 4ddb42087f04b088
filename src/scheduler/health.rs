/*!
 * Health Tracker
 * Per-process statistics, health score and circuit-breaker escalation
 */

use super::executor::Execution;
use crate::config::WarningConfig;
use crate::core::limits::*;
use crate::core::types::{Compute, Cycle};
use crate::monitoring::Notification;
use crate::process::{Process, ProcessState, ProcessStats, Suspension};
use tracing::{info, warn};

/// Escalation step for a failure streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    None,
    /// Suspend for this many cycles
    Transient(Cycle),
    Permanent,
}

/// Map a post-increment failure streak to its escalation
///
/// Thresholds are discrete: backoff `min(1000, 2^streak)` from streak 3,
/// permanent from streak 10.
pub fn escalation_for(streak: u32) -> Escalation {
    if streak >= PERMANENT_SUSPENSION_STREAK {
        Escalation::Permanent
    } else if streak >= TRANSIENT_SUSPENSION_STREAK {
        Escalation::Transient(2u64.saturating_pow(streak).min(MAX_BACKOFF_CYCLES))
    } else {
        Escalation::None
    }
}

/// Health score in `[0, 100]`
pub fn health_score(stats: &ProcessStats, now: Cycle) -> f64 {
    if stats.run_count == 0 {
        return HEALTH_MAX;
    }

    let successes = stats.run_count.saturating_sub(stats.error_count);
    let success_ratio = successes as f64 / stats.run_count as f64 * 100.0;

    let recent_success = stats.last_success_cycle > 0
        && now.saturating_sub(stats.last_success_cycle) < RECENT_SUCCESS_WINDOW;
    let bonus = if recent_success { RECENT_SUCCESS_BONUS } else { 0.0 };

    let penalty = STREAK_PENALTY * stats.consecutive_error_count as f64;

    (success_ratio + bonus - penalty).clamp(HEALTH_MIN, HEALTH_MAX)
}

/// Context for recording one run
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    pub now: Cycle,
    /// Effective cycle ceiling
    pub ceiling: Compute,
    /// Budget fraction in force for the process
    pub budget: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct HealthTracker {
    warnings: WarningConfig,
}

impl HealthTracker {
    pub fn new(warnings: WarningConfig) -> Self {
        Self { warnings }
    }

    /// Fold an execution into the process statistics
    ///
    /// Returns the suspension notification when the failure streak escalates.
    pub fn record(
        &self,
        process: &mut Process,
        ctx: &RunContext,
        execution: &Execution,
    ) -> Option<Notification> {
        let now = ctx.now;
        let cost = execution.cost;
        let stats = &mut process.stats;

        stats.total_cost += cost;
        stats.run_count += 1;
        stats.average_cost = stats.total_cost / stats.run_count as f64;
        stats.peak_cost = stats.peak_cost.max(cost);
        stats.last_run_cycle = now;

        match &execution.outcome {
            Ok(()) => {
                stats.consecutive_error_count = 0;
                stats.last_success_cycle = now;
                process.state = ProcessState::Idle;
            }
            Err(err) => {
                stats.error_count += 1;
                stats.consecutive_error_count += 1;
                stats.last_error = Some(err.to_string());
                process.state = ProcessState::ErroredThisCycle;
                warn!(
                    process = %process.id,
                    cycle = now,
                    streak = stats.consecutive_error_count,
                    error = %err,
                    "Process work failed"
                );
            }
        }

        stats.health_score = health_score(stats, now);
        self.check_overrun(process, ctx, cost);

        if execution.outcome.is_ok() {
            return None;
        }

        let streak = process.stats.consecutive_error_count;
        match escalation_for(streak) {
            Escalation::None => None,
            Escalation::Transient(cycles) => {
                let until = now.saturating_add(cycles);
                let reason = format!(
                    "circuit-breaker: {} consecutive failures, suspended until cycle {}",
                    streak, until
                );
                Some(suspend(process, Suspension::Until(until), reason))
            }
            Escalation::Permanent => {
                let reason = format!(
                    "circuit-breaker: {} consecutive failures (permanent)",
                    streak
                );
                Some(suspend(process, Suspension::Permanent, reason))
            }
        }
    }

    /// Soft overrun warning; counted always, logged on sparse cycles
    fn check_overrun(&self, process: &mut Process, ctx: &RunContext, cost: Compute) {
        let limit = ctx.ceiling * ctx.budget * self.warnings.overrun_multiplier;
        if limit <= 0.0 || cost <= limit {
            return;
        }

        process.stats.overrun_count += 1;
        if ctx.now % self.warnings.overrun_log_interval.max(1) == 0 {
            warn!(
                process = %process.id,
                cycle = ctx.now,
                cost,
                budget = ctx.ceiling * ctx.budget,
                overruns = process.stats.overrun_count,
                "Process exceeded its cpu budget"
            );
        }
    }
}

/// Put a process into suspension and build the notification
pub(crate) fn suspend(process: &mut Process, suspension: Suspension, reason: String) -> Notification {
    process.state = ProcessState::Suspended;
    process.stats.suspension = Some(suspension);
    process.stats.suspension_reason = Some(reason.clone());

    warn!(
        process = %process.id,
        reason = %reason,
        permanent = suspension.is_permanent(),
        "Process suspended"
    );

    Notification::ProcessSuspended {
        id: process.id.clone(),
        name: process.name.clone(),
        reason,
        consecutive_errors: process.stats.consecutive_error_count,
        permanent: suspension.is_permanent(),
        resume_at_cycle: suspension.resume_at(),
    }
}

/// Clear suspension fields; `None` if the process was not suspended
pub(crate) fn lift_suspension(process: &mut Process, manual: bool) -> Option<Notification> {
    process.stats.suspension.take()?;
    let previous_reason = process.stats.suspension_reason.take();
    process.state = ProcessState::Idle;

    info!(
        process = %process.id,
        manual,
        previous_reason = previous_reason.as_deref().unwrap_or(""),
        "Process resumed"
    );

    Some(Notification::ProcessRecovered {
        id: process.id.clone(),
        name: process.name.clone(),
        previous_reason,
        consecutive_errors: process.stats.consecutive_error_count,
        manual,
    })
}
