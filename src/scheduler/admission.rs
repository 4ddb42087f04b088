/*!
 * Admission Controller
 * Per-cycle due check, reserve gate and global budget gate
 */

use super::health::lift_suspension;
use crate::core::types::{Compute, Cycle};
use crate::host::ClockSnapshot;
use crate::monitoring::NotificationSink;
use crate::process::Process;
use tracing::debug;

/// Admission decision for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Due and within budget; execute now
    Run,
    /// Not scheduled on this cycle
    NotDue,
    /// Suspension still in force
    Suspended,
    /// Reserve gauge below the process minimum
    ReserveTooLow,
    /// Cycle budget spent; stop the loop and defer everyone left
    BudgetExhausted,
}

/// Whether a process's schedule selects cycle `now`
///
/// Fixed-phase schedules ignore the interval entirely.
#[inline]
pub fn is_due(process: &Process, now: Cycle) -> bool {
    if process.schedule.is_fixed_phase() {
        return process.schedule.matches(now);
    }
    process.stats.run_count == 0 || now.saturating_sub(process.stats.last_run_cycle) >= process.interval
}

#[derive(Debug, Clone, Copy)]
pub struct AdmissionController {
    reserved_fraction: f64,
}

impl AdmissionController {
    pub fn new(reserved_fraction: f64) -> Self {
        Self { reserved_fraction }
    }

    /// Global gate: starting anything must leave the reserved floor free
    #[inline]
    pub fn has_budget(&self, consumed: Compute, ceiling: Compute) -> bool {
        consumed + ceiling * self.reserved_fraction < ceiling
    }

    /// Decide for `process` on this cycle
    ///
    /// An expired suspension is lifted here, publishing exactly one
    /// recovery notification before the schedule checks run.
    pub fn admit(
        &self,
        process: &mut Process,
        clock: &ClockSnapshot,
        consumed: Compute,
        sink: &mut dyn NotificationSink,
    ) -> Admission {
        if let Some(suspension) = process.stats.suspension {
            if suspension.holds_at(clock.now) {
                return Admission::Suspended;
            }
            if let Some(notification) = lift_suspension(process, false) {
                sink.publish(notification);
            }
        }

        if !is_due(process, clock.now) {
            return Admission::NotDue;
        }

        if clock.reserve < process.min_reserve {
            process.stats.skipped_count += 1;
            debug!(
                process = %process.id,
                reserve = clock.reserve,
                min_reserve = process.min_reserve,
                "Skipped, reserve below minimum"
            );
            return Admission::ReserveTooLow;
        }

        if !self.has_budget(consumed, clock.ceiling) {
            return Admission::BudgetExhausted;
        }

        Admission::Run
    }
}
