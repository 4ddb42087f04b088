/*!
 * Kernel Builder
 * Builder pattern for Kernel construction
 */

use super::stats::KernelStats;
use super::Kernel;
use crate::config::KernelConfig;
use crate::host::Host;
use crate::monitoring::{NotificationSink, TracingSink};
use crate::process::{JitterSource, ProcessRegistry, SchedulingQueue, SeededJitter};
use crate::scheduler::{AdmissionController, BudgetPlanner, Executor, HealthTracker};
use tracing::info;

/// Builder for Kernel
pub struct KernelBuilder<H: Host> {
    host: H,
    config: KernelConfig,
    sink: Option<Box<dyn NotificationSink>>,
    jitter: Option<Box<dyn JitterSource>>,
}

impl<H: Host> KernelBuilder<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            config: KernelConfig::default(),
            sink: None,
            jitter: None,
        }
    }

    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = config;
        self
    }

    /// Route suspension/recovery notifications to `sink`
    pub fn with_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Override the interval jitter source (seeded from config by default)
    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Some(Box::new(jitter));
        self
    }

    pub fn build(self) -> Kernel<H> {
        let config = self.config.normalized();

        let jitter: Box<dyn JitterSource> = match (self.jitter, config.jitter_seed) {
            (Some(jitter), _) => jitter,
            (None, Some(seed)) => Box::new(SeededJitter::new(seed)),
            (None, None) => Box::new(SeededJitter::from_entropy()),
        };

        let planner = config.adaptive.enabled.then(|| {
            BudgetPlanner::new(
                config.frequency_defaults,
                config.adaptive,
                config.reserve_thresholds,
            )
        });

        info!(
            target_utilization = config.target_utilization,
            reserved_fraction = config.reserved_fraction,
            adaptive = planner.is_some(),
            "Kernel initialized"
        );

        Kernel {
            host: self.host,
            registry: ProcessRegistry::new(jitter),
            queue: SchedulingQueue::new(),
            admission: AdmissionController::new(config.reserved_fraction),
            executor: Executor::new(),
            health: HealthTracker::new(config.warnings),
            planner,
            budgets: config.frequency_defaults,
            sink: self.sink.unwrap_or_else(|| Box::new(TracingSink)),
            stats: KernelStats::default(),
            config,
        }
    }
}
