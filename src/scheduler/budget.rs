/*!
 * Adaptive Budget Planner
 * Rescales per-class cpu budgets from active domain count and reserve level
 */

use crate::config::{AdaptiveConfig, FrequencyTable, ReserveStatus, ReserveThresholds};
use crate::core::types::Compute;
use crate::process::FrequencyClass;
use tracing::debug;

/// Derives the defaults table from a fixed base table
///
/// Only class defaults move; explicit per-process budgets are never touched.
#[derive(Debug, Clone)]
pub struct BudgetPlanner {
    base: FrequencyTable,
    config: AdaptiveConfig,
    thresholds: ReserveThresholds,
}

impl BudgetPlanner {
    pub fn new(base: FrequencyTable, config: AdaptiveConfig, thresholds: ReserveThresholds) -> Self {
        Self {
            base,
            config,
            thresholds,
        }
    }

    /// Sub-linear growth with domain count, capped
    pub fn domain_scale(&self, domains: usize) -> f64 {
        let n = domains.max(1) as f64;
        (1.0 + self.config.domain_log_factor * n.ln()).min(self.config.max_domain_scale)
    }

    /// Tiered scale: shrink at low reserve, grow at high reserve
    pub fn reserve_scale(&self, reserve: Compute) -> f64 {
        self.config.reserve_scale(self.thresholds.status(reserve))
    }

    pub fn status(&self, reserve: Compute) -> ReserveStatus {
        self.thresholds.status(reserve)
    }

    /// Recompute the defaults table
    pub fn plan(&self, domains: usize, reserve: Compute) -> FrequencyTable {
        let scale = self.domain_scale(domains) * self.reserve_scale(reserve);
        let mut table = self.base;
        for class in FrequencyClass::ALL {
            table.get_mut(class).cpu_budget = self.base.get(class).cpu_budget * scale;
        }

        debug!(
            domains,
            reserve,
            scale,
            high = table.high.cpu_budget,
            medium = table.medium.cpu_budget,
            low = table.low.cpu_budget,
            "Budgets replanned"
        );
        table
    }
}
