/*!
 * Process Types
 * Common types for process registration and scheduling
 */

use crate::core::limits::HEALTH_MAX;
use crate::core::types::{Compute, Cycle, ProcessId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Work callback invoked once per eligible cycle
pub type Work = Box<dyn FnMut() -> anyhow::Result<()>>;

/// Fixed priority ordinal; the queue is always sorted by it, descending
///
/// Declaration order matches the numeric value so the derived `Ord`
/// agrees with [`Priority::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Priority {
    Idle = 10,
    Low = 25,
    Medium = 50,
    High = 75,
    Critical = 100,
}

impl Priority {
    #[inline(always)]
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frequency class supplying interval, reserve and budget defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyClass {
    High,
    #[default]
    Medium,
    Low,
}

impl FrequencyClass {
    pub const ALL: [FrequencyClass; 3] = [Self::High, Self::Medium, Self::Low];
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Waiting for its next eligible cycle
    Idle,
    /// Work callback is executing
    Running,
    /// Excluded from scheduling until resumed
    Suspended,
    /// Failed this cycle without escalation; schedulable like `Idle`
    ErroredThisCycle,
}

/// Suspension of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cycle", rename_all = "snake_case")]
pub enum Suspension {
    /// Resumes automatically once the clock reaches this cycle
    Until(Cycle),
    /// Circuit open; only an administrative resume clears it
    Permanent,
}

impl Suspension {
    #[inline]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent)
    }

    #[inline]
    pub const fn resume_at(&self) -> Option<Cycle> {
        match self {
            Self::Until(cycle) => Some(*cycle),
            Self::Permanent => None,
        }
    }

    /// Whether the suspension still holds at `now`
    #[inline]
    pub const fn holds_at(&self, now: Cycle) -> bool {
        match self {
            Self::Until(cycle) => now < *cycle,
            Self::Permanent => true,
        }
    }
}

/// Per-process execution statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStats {
    pub total_cost: Compute,
    pub run_count: u64,
    pub average_cost: Compute,
    pub peak_cost: Compute,
    pub last_run_cycle: Cycle,
    pub last_success_cycle: Cycle,
    pub skipped_count: u64,
    pub error_count: u64,
    pub consecutive_error_count: u32,
    pub overrun_count: u64,
    pub health_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspension: Option<Suspension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspension_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ProcessStats {
    /// Zero the counters while keeping suspension state
    pub fn reset(&mut self) {
        let suspension = self.suspension.take();
        let reason = self.suspension_reason.take();
        *self = Self {
            suspension,
            suspension_reason: reason,
            ..Self::default()
        };
    }

    #[inline]
    pub fn is_suspended(&self) -> bool {
        self.suspension.is_some()
    }
}

impl Default for ProcessStats {
    fn default() -> Self {
        Self {
            total_cost: 0.0,
            run_count: 0,
            average_cost: 0.0,
            peak_cost: 0.0,
            last_run_cycle: 0,
            last_success_cycle: 0,
            skipped_count: 0,
            error_count: 0,
            consecutive_error_count: 0,
            overrun_count: 0,
            health_score: HEALTH_MAX,
            suspension: None,
            suspension_reason: None,
            last_error: None,
        }
    }
}

/// Registration request
///
/// Unset fields are filled from the frequency class defaults.
pub struct ProcessSpec {
    pub id: ProcessId,
    pub name: String,
    pub priority: Priority,
    pub frequency_class: Option<FrequencyClass>,
    pub interval: Option<Cycle>,
    pub tick_modulo: Option<i64>,
    pub tick_offset: Option<i64>,
    pub min_reserve: Option<Compute>,
    pub cpu_budget: Option<f64>,
    pub work: Work,
}

impl ProcessSpec {
    pub fn new<F>(id: impl Into<ProcessId>, name: impl Into<String>, priority: Priority, work: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        Self {
            id: id.into(),
            name: name.into(),
            priority,
            frequency_class: None,
            interval: None,
            tick_modulo: None,
            tick_offset: None,
            min_reserve: None,
            cpu_budget: None,
            work: Box::new(work),
        }
    }

    #[must_use]
    pub fn with_frequency(mut self, class: FrequencyClass) -> Self {
        self.frequency_class = Some(class);
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Cycle) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Fixed-phase schedule: run when `(cycle + offset) % modulo == 0`
    #[must_use]
    pub fn with_tick_schedule(mut self, modulo: i64, offset: i64) -> Self {
        self.tick_modulo = Some(modulo);
        self.tick_offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_min_reserve(mut self, reserve: Compute) -> Self {
        self.min_reserve = Some(reserve);
        self
    }

    #[must_use]
    pub fn with_cpu_budget(mut self, fraction: f64) -> Self {
        self.cpu_budget = Some(fraction);
        self
    }
}

impl fmt::Debug for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessSpec")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("frequency_class", &self.frequency_class)
            .field("interval", &self.interval)
            .field("tick_modulo", &self.tick_modulo)
            .field("tick_offset", &self.tick_offset)
            .field("min_reserve", &self.min_reserve)
            .field("cpu_budget", &self.cpu_budget)
            .finish_non_exhaustive()
    }
}

/// Read-only snapshot of a registered process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessView {
    pub id: ProcessId,
    pub name: String,
    pub priority: Priority,
    pub frequency_class: FrequencyClass,
    pub interval: Cycle,
    pub tick_modulo: u64,
    pub tick_offset: u64,
    pub min_reserve: Compute,
    /// Effective budget fraction (override or current class default)
    pub cpu_budget: f64,
    pub state: ProcessState,
    pub stats: ProcessStats,
}
