/*!
 * Kernel
 * Composes registry, queue, admission, execution and health tracking into
 * the per-cycle `run()` entry point
 *
 * The kernel is strictly cooperative: `run()` takes `&mut self`, so work
 * callbacks cannot re-enter it, and registry mutation can never race a
 * cycle in progress.
 */

mod builder;
mod control;
mod stats;

pub use builder::KernelBuilder;
pub use stats::{CostEntry, CycleReport, HealthEntry, KernelStats, KernelSummary};

use crate::config::{FrequencyTable, KernelConfig};
use crate::host::{ClockSnapshot, Host};
use crate::monitoring::{span_cycle, NotificationSink};
use crate::process::{ProcessRegistry, ProcessState, SchedulingQueue};
use crate::scheduler::{
    Admission, AdmissionController, BudgetPlanner, Executor, HealthTracker, RunContext,
};

/// Cooperative per-cycle scheduler
pub struct Kernel<H: Host> {
    host: H,
    config: KernelConfig,
    registry: ProcessRegistry,
    queue: SchedulingQueue,
    admission: AdmissionController,
    executor: Executor,
    health: HealthTracker,
    planner: Option<BudgetPlanner>,
    /// Defaults table in force, replanned each cycle when adaptive
    budgets: FrequencyTable,
    sink: Box<dyn NotificationSink>,
    stats: KernelStats,
}

impl<H: Host> Kernel<H> {
    /// Kernel with default configuration
    pub fn new(host: H) -> Self {
        KernelBuilder::new(host).build()
    }

    pub fn builder(host: H) -> KernelBuilder<H> {
        KernelBuilder::new(host)
    }

    /// Execute one cycle
    ///
    /// Visits processes in queue order until every process was considered
    /// or the budget gate closes. Work failures are contained and folded
    /// into statistics; nothing a process does can abort the cycle.
    pub fn run(&mut self) -> CycleReport {
        let clock = ClockSnapshot::capture(&self.host, self.config.target_utilization);
        let span = span_cycle(clock.now);
        let _guard = span.enter();

        if let Some(planner) = &self.planner {
            self.budgets = planner.plan(clock.domains, clock.reserve);
        }

        let mut report = CycleReport::new(
            clock.now,
            self.config.reserve_thresholds.status(clock.reserve),
        );

        for process in self.registry.iter_mut() {
            if process.state == ProcessState::ErroredThisCycle {
                process.state = ProcessState::Idle;
            }
        }

        self.queue.sync(&self.registry);
        let order = self.queue.visit_order();
        let meter_start = self.host.consumed_so_far();
        let mut completed_pass = true;

        for (index, id) in order.iter().enumerate() {
            let Some(process) = self.registry.get_mut(id.as_str()) else {
                continue;
            };

            let consumed = self.host.consumed_so_far();
            match self
                .admission
                .admit(process, &clock, consumed, self.sink.as_mut())
            {
                Admission::Run => {}
                Admission::NotDue => {
                    report.not_due += 1;
                    continue;
                }
                Admission::Suspended => {
                    report.skipped_suspended += 1;
                    continue;
                }
                Admission::ReserveTooLow => {
                    report.skipped_reserve += 1;
                    continue;
                }
                Admission::BudgetExhausted => {
                    report.budget_exhausted = true;
                    report.deferred = order.len() - index;
                    self.queue.defer_at(id);
                    completed_pass = false;
                    tracing::debug!(
                        cycle = clock.now,
                        consumed,
                        ceiling = clock.ceiling,
                        deferred = report.deferred,
                        next = %id,
                        "Cycle budget exhausted"
                    );
                    break;
                }
            }

            let execution = self.executor.execute(&self.host, process);
            report.executed += 1;
            if !execution.succeeded() {
                report.failed += 1;
            }

            let ctx = RunContext {
                now: clock.now,
                ceiling: clock.ceiling,
                budget: process.effective_budget(&self.budgets),
            };
            if let Some(notification) = self.health.record(process, &ctx, &execution) {
                self.sink.publish(notification);
            }
        }

        if completed_pass {
            self.queue.complete_pass();
        }

        report.cost = (self.host.consumed_so_far() - meter_start).max(0.0);
        span.record_outcome(
            report.executed,
            report.failed,
            report.cost,
            report.budget_exhausted,
        );
        self.stats.record(&report);
        report
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Per-class defaults currently in force
    pub fn budget_table(&self) -> &FrequencyTable {
        &self.budgets
    }

    pub fn kernel_stats(&self) -> &KernelStats {
        &self.stats
    }
}
