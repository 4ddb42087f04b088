/*!
 * Process Registry
 * Owns registered processes keyed by id; validates and normalizes registration
 */

use super::jitter::JitterSource;
use super::types::{
    FrequencyClass, Priority, ProcessSpec, ProcessState, ProcessStats, ProcessView, Work,
};
use super::validation::{validate_schedule, TickSchedule};
use crate::config::FrequencyTable;
use crate::core::errors::ScheduleValidationError;
use crate::core::types::{Compute, Cycle, ProcessId};
use ahash::RandomState;
use std::collections::HashMap;
use std::fmt;
use tracing::info;

/// A registered unit of recurring work
pub struct Process {
    pub id: ProcessId,
    pub name: String,
    pub priority: Priority,
    pub frequency_class: FrequencyClass,
    /// Jittered interval, resolved once at registration
    pub interval: Cycle,
    pub schedule: TickSchedule,
    pub min_reserve: Compute,
    /// Explicit budget override; `None` follows the class default
    pub cpu_budget: Option<f64>,
    pub state: ProcessState,
    pub stats: ProcessStats,
    /// Registration sequence, breaks priority ties
    pub(crate) seq: u64,
    pub(crate) work: Work,
}

impl Process {
    /// Budget fraction currently in force for this process
    #[inline]
    pub fn effective_budget(&self, budgets: &FrequencyTable) -> f64 {
        self.cpu_budget
            .unwrap_or_else(|| budgets.get(self.frequency_class).cpu_budget)
    }

    pub fn view(&self, budgets: &FrequencyTable) -> ProcessView {
        ProcessView {
            id: self.id.clone(),
            name: self.name.clone(),
            priority: self.priority,
            frequency_class: self.frequency_class,
            interval: self.interval,
            tick_modulo: self.schedule.modulo,
            tick_offset: self.schedule.offset,
            min_reserve: self.min_reserve,
            cpu_budget: self.effective_budget(budgets),
            state: self.state,
            stats: self.stats.clone(),
        }
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("interval", &self.interval)
            .field("schedule", &self.schedule)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Process table
///
/// Every membership or ordering change bumps `generation`, which the
/// scheduling queue compares against to rebuild lazily.
pub struct ProcessRegistry {
    processes: HashMap<ProcessId, Process, RandomState>,
    jitter: Box<dyn JitterSource>,
    next_seq: u64,
    generation: u64,
}

impl ProcessRegistry {
    pub fn new(jitter: Box<dyn JitterSource>) -> Self {
        Self {
            processes: HashMap::with_hasher(RandomState::new()),
            jitter,
            next_seq: 0,
            generation: 0,
        }
    }

    /// Validate, normalize and store a process
    ///
    /// Returns `true` when an existing entry with the same id was replaced.
    /// On error nothing is stored.
    pub fn register(
        &mut self,
        spec: ProcessSpec,
        defaults: &FrequencyTable,
    ) -> Result<bool, ScheduleValidationError> {
        let schedule = validate_schedule(spec.tick_modulo, spec.tick_offset)?;

        let class = spec.frequency_class.unwrap_or_default();
        let class_defaults = defaults.get(class);
        let base_interval = spec.interval.unwrap_or(class_defaults.interval);
        let interval = self.jitter.jitter(base_interval);

        let seq = match self.processes.get(&spec.id) {
            Some(existing) => existing.seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };

        let process = Process {
            id: spec.id.clone(),
            name: spec.name,
            priority: spec.priority,
            frequency_class: class,
            interval,
            schedule,
            min_reserve: spec.min_reserve.unwrap_or(class_defaults.min_reserve),
            cpu_budget: spec.cpu_budget,
            state: ProcessState::Idle,
            stats: ProcessStats::default(),
            seq,
            work: spec.work,
        };

        info!(
            process = %process.id,
            name = %process.name,
            priority = %process.priority,
            interval = process.interval,
            tick_modulo = process.schedule.modulo,
            tick_offset = process.schedule.offset,
            "Process registered"
        );

        let replaced = self.processes.insert(spec.id, process).is_some();
        self.generation += 1;
        Ok(replaced)
    }

    pub fn unregister(&mut self, id: &str) -> bool {
        match self.processes.remove(id) {
            Some(process) => {
                self.generation += 1;
                info!(process = %process.id, "Process unregistered");
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Process> {
        self.processes.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Process> {
        self.processes.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Process> {
        self.processes.values_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
