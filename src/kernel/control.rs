/*!
 * Administrative Control Surface
 * Registration, manual suspend/resume, listings and statistics
 */

use super::stats::{CostEntry, HealthEntry, KernelStats, KernelSummary};
use super::Kernel;
use crate::core::limits::{MANUAL_SUSPENSION_REASON, UNHEALTHY_THRESHOLD};
use crate::core::types::KernelResult;
use crate::host::Host;
use crate::process::{Process, ProcessSpec, ProcessView, Suspension};
use crate::scheduler::health::{lift_suspension, suspend};
use std::cmp::Ordering;
use tracing::info;

impl<H: Host> Kernel<H> {
    /// Register (or replace) a process
    ///
    /// Malformed fixed-phase schedules are rejected before any state is
    /// created.
    pub fn register_process(&mut self, spec: ProcessSpec) -> KernelResult<()> {
        self.registry
            .register(spec, &self.config.frequency_defaults)?;
        Ok(())
    }

    pub fn unregister_process(&mut self, id: &str) -> bool {
        self.registry.unregister(id)
    }

    /// Suspend until an administrative resume
    ///
    /// Returns `false` for unknown or already suspended processes.
    pub fn suspend_process(&mut self, id: &str) -> bool {
        let Some(process) = self.registry.get_mut(id) else {
            return false;
        };
        if process.stats.is_suspended() {
            return false;
        }

        let notification = suspend(
            process,
            Suspension::Permanent,
            MANUAL_SUSPENSION_REASON.to_string(),
        );
        self.sink.publish(notification);
        true
    }

    /// Clear any suspension, whatever its cause
    ///
    /// Returns `false` (and publishes nothing) if the process is unknown or
    /// not suspended.
    pub fn resume_process(&mut self, id: &str) -> bool {
        let Some(process) = self.registry.get_mut(id) else {
            return false;
        };
        match lift_suspension(process, true) {
            Some(notification) => {
                self.sink.publish(notification);
                true
            }
            None => false,
        }
    }

    /// Every registered process in scheduling order, suspended ones included
    pub fn get_processes(&self) -> Vec<ProcessView> {
        self.sorted_processes()
            .into_iter()
            .map(|p| p.view(&self.budgets))
            .collect()
    }

    pub fn get_process(&self, id: &str) -> Option<ProcessView> {
        self.registry.get(id).map(|p| p.view(&self.budgets))
    }

    pub fn process_count(&self) -> usize {
        self.registry.len()
    }

    pub fn get_stats_summary(&self) -> KernelSummary {
        let mut summary = KernelSummary {
            total_processes: self.registry.len(),
            active_processes: 0,
            suspended_processes: 0,
            total_runs: 0,
            total_errors: 0,
            total_skips: 0,
            total_cost: 0.0,
            top_by_average_cost: Vec::new(),
            unhealthy: Vec::new(),
            kernel: self.stats.clone(),
        };

        let processes = self.sorted_processes();
        for process in &processes {
            let stats = &process.stats;
            if stats.is_suspended() {
                summary.suspended_processes += 1;
            } else {
                summary.active_processes += 1;
            }
            summary.total_runs += stats.run_count;
            summary.total_errors += stats.error_count;
            summary.total_skips += stats.skipped_count;
            summary.total_cost += stats.total_cost;

            if stats.health_score < UNHEALTHY_THRESHOLD {
                summary.unhealthy.push(HealthEntry {
                    id: process.id.clone(),
                    name: process.name.clone(),
                    health_score: stats.health_score,
                    consecutive_errors: stats.consecutive_error_count,
                    suspended: stats.is_suspended(),
                });
            }
        }

        let mut by_cost: Vec<&Process> = processes
            .into_iter()
            .filter(|p| p.stats.run_count > 0)
            .collect();
        by_cost.sort_by(|a, b| {
            b.stats
                .average_cost
                .total_cmp(&a.stats.average_cost)
                .then_with(|| a.id.cmp(&b.id))
        });
        summary.top_by_average_cost = by_cost
            .into_iter()
            .take(self.config.summary_top_n)
            .map(|p| CostEntry {
                id: p.id.clone(),
                name: p.name.clone(),
                average_cost: p.stats.average_cost,
                peak_cost: p.stats.peak_cost,
                run_count: p.stats.run_count,
            })
            .collect();

        summary
    }

    /// Zero all statistics; suspensions stay in force
    pub fn reset_stats(&mut self) {
        for process in self.registry.iter_mut() {
            process.stats.reset();
        }
        self.stats = KernelStats::default();
        info!(processes = self.registry.len(), "Statistics reset");
    }

    fn sorted_processes(&self) -> Vec<&Process> {
        let mut processes: Vec<&Process> = self.registry.iter().collect();
        processes.sort_by(|a, b| match b.priority.cmp(&a.priority) {
            Ordering::Equal => a.seq.cmp(&b.seq),
            other => other,
        });
        processes
    }
}
