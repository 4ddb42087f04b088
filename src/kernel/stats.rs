/*!
 * Kernel Statistics
 * Per-cycle reports, aggregate counters and the administrative summary
 */

use crate::config::ReserveStatus;
use crate::core::types::{Compute, Cycle, ProcessId};
use serde::{Deserialize, Serialize};

/// Outcome of one `run()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle: Cycle,
    pub executed: usize,
    pub failed: usize,
    pub not_due: usize,
    pub skipped_reserve: usize,
    pub skipped_suspended: usize,
    /// Processes left unvisited when the budget gate closed
    pub deferred: usize,
    pub budget_exhausted: bool,
    /// Meter delta across the whole cycle
    pub cost: Compute,
    pub reserve_status: ReserveStatus,
}

impl CycleReport {
    pub fn new(cycle: Cycle, reserve_status: ReserveStatus) -> Self {
        Self {
            cycle,
            executed: 0,
            failed: 0,
            not_due: 0,
            skipped_reserve: 0,
            skipped_suspended: 0,
            deferred: 0,
            budget_exhausted: false,
            cost: 0.0,
            reserve_status,
        }
    }
}

/// Aggregate counters across cycles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelStats {
    pub cycles: u64,
    pub executions: u64,
    pub failures: u64,
    pub budget_exhausted_cycles: u64,
    pub total_cost: Compute,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cycle: Option<CycleReport>,
}

impl KernelStats {
    pub fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        self.executions += report.executed as u64;
        self.failures += report.failed as u64;
        if report.budget_exhausted {
            self.budget_exhausted_cycles += 1;
        }
        self.total_cost += report.cost;
        self.last_cycle = Some(report.clone());
    }

    pub fn average_cycle_cost(&self) -> Compute {
        if self.cycles == 0 {
            0.0
        } else {
            self.total_cost / self.cycles as f64
        }
    }
}

/// Entry in the most-expensive list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    pub id: ProcessId,
    pub name: String,
    pub average_cost: Compute,
    pub peak_cost: Compute,
    pub run_count: u64,
}

/// Entry in the unhealthy list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEntry {
    pub id: ProcessId,
    pub name: String,
    pub health_score: f64,
    pub consecutive_errors: u32,
    pub suspended: bool,
}

/// Administrative summary returned by `get_stats_summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelSummary {
    pub total_processes: usize,
    pub active_processes: usize,
    pub suspended_processes: usize,
    pub total_runs: u64,
    pub total_errors: u64,
    pub total_skips: u64,
    pub total_cost: Compute,
    pub top_by_average_cost: Vec<CostEntry>,
    pub unhealthy: Vec<HealthEntry>,
    pub kernel: KernelStats,
}
