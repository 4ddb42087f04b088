/*!
 * Kernel Configuration
 * In-memory configuration surface supplied at construction
 *
 * Every section has sane defaults, so a config file only needs the keys it
 * overrides. Inconsistent values are auto-corrected by [`KernelConfig::normalized`]
 * and the correction is logged rather than rejected.
 */

use crate::core::errors::ConfigError;
use crate::core::limits::*;
use crate::core::types::{Compute, Cycle};
use crate::process::types::FrequencyClass;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Reserve gauge classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveStatus {
    Critical,
    Low,
    Normal,
    High,
}

/// Reserve-level thresholds, expected `critical < low < high`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReserveThresholds {
    pub critical: Compute,
    pub low: Compute,
    pub high: Compute,
}

impl ReserveThresholds {
    pub fn is_consistent(&self) -> bool {
        self.critical < self.low && self.low < self.high
    }

    /// Nearest valid ordering: sort, then push values apart by a minimal step
    pub fn normalized(self) -> Self {
        if self.is_consistent() {
            return self;
        }

        let mut values = [self.critical, self.low, self.high].map(|v| if v.is_nan() { 0.0 } else { v });
        values.sort_by(|a, b| a.total_cmp(b));
        if values[1] < values[0] + RESERVE_THRESHOLD_STEP {
            values[1] = values[0] + RESERVE_THRESHOLD_STEP;
        }
        if values[2] < values[1] + RESERVE_THRESHOLD_STEP {
            values[2] = values[1] + RESERVE_THRESHOLD_STEP;
        }

        let fixed = Self {
            critical: values[0],
            low: values[1],
            high: values[2],
        };
        warn!(
            critical = self.critical,
            low = self.low,
            high = self.high,
            fixed_critical = fixed.critical,
            fixed_low = fixed.low,
            fixed_high = fixed.high,
            "Reserve thresholds out of order, auto-corrected"
        );
        fixed
    }

    pub fn status(&self, reserve: Compute) -> ReserveStatus {
        if reserve < self.critical {
            ReserveStatus::Critical
        } else if reserve < self.low {
            ReserveStatus::Low
        } else if reserve >= self.high {
            ReserveStatus::High
        } else {
            ReserveStatus::Normal
        }
    }
}

impl Default for ReserveThresholds {
    fn default() -> Self {
        Self {
            critical: DEFAULT_RESERVE_CRITICAL,
            low: DEFAULT_RESERVE_LOW,
            high: DEFAULT_RESERVE_HIGH,
        }
    }
}

/// Defaults a frequency class supplies to unset registration fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrequencyDefaults {
    pub interval: Cycle,
    pub min_reserve: Compute,
    pub cpu_budget: f64,
}

/// Per-class defaults table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrequencyTable {
    pub high: FrequencyDefaults,
    pub medium: FrequencyDefaults,
    pub low: FrequencyDefaults,
}

impl FrequencyTable {
    pub fn get(&self, class: FrequencyClass) -> &FrequencyDefaults {
        match class {
            FrequencyClass::High => &self.high,
            FrequencyClass::Medium => &self.medium,
            FrequencyClass::Low => &self.low,
        }
    }

    pub fn get_mut(&mut self, class: FrequencyClass) -> &mut FrequencyDefaults {
        match class {
            FrequencyClass::High => &mut self.high,
            FrequencyClass::Medium => &mut self.medium,
            FrequencyClass::Low => &mut self.low,
        }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            high: FrequencyDefaults {
                interval: 1,
                min_reserve: 0.0,
                cpu_budget: 0.10,
            },
            medium: FrequencyDefaults {
                interval: 5,
                min_reserve: 1000.0,
                cpu_budget: 0.05,
            },
            low: FrequencyDefaults {
                interval: 20,
                min_reserve: 3000.0,
                cpu_budget: 0.02,
            },
        }
    }
}

/// Adaptive budgeting parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdaptiveConfig {
    pub enabled: bool,
    /// Growth of the domain scale per natural-log unit of active domains
    pub domain_log_factor: f64,
    pub max_domain_scale: f64,
    pub critical_scale: f64,
    pub low_scale: f64,
    pub normal_scale: f64,
    pub high_scale: f64,
}

impl AdaptiveConfig {
    pub fn reserve_scale(&self, status: ReserveStatus) -> f64 {
        match status {
            ReserveStatus::Critical => self.critical_scale,
            ReserveStatus::Low => self.low_scale,
            ReserveStatus::Normal => self.normal_scale,
            ReserveStatus::High => self.high_scale,
        }
    }
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            domain_log_factor: DEFAULT_DOMAIN_LOG_FACTOR,
            max_domain_scale: DEFAULT_MAX_DOMAIN_SCALE,
            critical_scale: 0.5,
            low_scale: 0.75,
            normal_scale: 1.0,
            high_scale: 1.25,
        }
    }
}

/// Soft budget-overrun warning settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WarningConfig {
    pub overrun_multiplier: f64,
    /// Warnings are only logged on cycles divisible by this interval
    pub overrun_log_interval: Cycle,
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            overrun_multiplier: DEFAULT_OVERRUN_MULTIPLIER,
            overrun_log_interval: DEFAULT_OVERRUN_LOG_INTERVAL,
        }
    }
}

/// Kernel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    pub reserve_thresholds: ReserveThresholds,
    /// Fraction of the host limit the kernel treats as its ceiling
    pub target_utilization: f64,
    /// Fraction of the ceiling kept free by admission control
    pub reserved_fraction: f64,
    pub frequency_defaults: FrequencyTable,
    pub adaptive: AdaptiveConfig,
    pub warnings: WarningConfig,
    pub summary_top_n: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter_seed: Option<u64>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            reserve_thresholds: ReserveThresholds::default(),
            target_utilization: DEFAULT_TARGET_UTILIZATION,
            reserved_fraction: DEFAULT_RESERVED_FRACTION,
            frequency_defaults: FrequencyTable::default(),
            adaptive: AdaptiveConfig::default(),
            warnings: WarningConfig::default(),
            summary_top_n: DEFAULT_SUMMARY_TOP_N,
            jitter_seed: None,
        }
    }
}

impl KernelConfig {
    /// Parse from JSON; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Auto-correct inconsistent values, logging each correction
    pub fn normalized(mut self) -> Self {
        self.reserve_thresholds = self.reserve_thresholds.normalized();

        if !(self.target_utilization > 0.0 && self.target_utilization <= 1.0) {
            let fixed = if self.target_utilization > 1.0 {
                1.0
            } else {
                DEFAULT_TARGET_UTILIZATION
            };
            warn!(
                value = self.target_utilization,
                fixed, "target_utilization outside (0, 1], auto-corrected"
            );
            self.target_utilization = fixed;
        }

        if !(self.reserved_fraction >= 0.0 && self.reserved_fraction < 1.0) {
            warn!(
                value = self.reserved_fraction,
                fixed = DEFAULT_RESERVED_FRACTION,
                "reserved_fraction outside [0, 1), auto-corrected"
            );
            self.reserved_fraction = DEFAULT_RESERVED_FRACTION;
        }

        if self.warnings.overrun_log_interval == 0 {
            warn!("overrun_log_interval of 0 auto-corrected to 1");
            self.warnings.overrun_log_interval = 1;
        }

        for class in FrequencyClass::ALL {
            let defaults = self.frequency_defaults.get_mut(class);
            if defaults.interval == 0 {
                warn!(?class, "frequency interval of 0 auto-corrected to 1");
                defaults.interval = 1;
            }
            if !(defaults.cpu_budget >= 0.0) {
                warn!(?class, value = defaults.cpu_budget, "negative cpu_budget auto-corrected to 0");
                defaults.cpu_budget = 0.0;
            }
        }

        self
    }
}
