/*!
 * Simulated Host
 * Shared-state host used by the kernel binary, tests and benches
 */

use super::Host;
use crate::core::types::{Compute, Cycle};
use parking_lot::Mutex;
use std::sync::Arc;

/// Default reserve bucket capacity
const DEFAULT_BUCKET_CAPACITY: Compute = 10_000.0;

#[derive(Debug)]
struct HostState {
    cycle: Cycle,
    consumed: Compute,
    limit: Compute,
    reserve: Compute,
    bucket_capacity: Compute,
    domains: usize,
}

/// Host simulation with a manual clock
///
/// Clones share state, so work callbacks can hold a handle and charge
/// compute through [`SimulatedHost::consume`] while the kernel reads it.
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    state: Arc<Mutex<HostState>>,
}

impl SimulatedHost {
    /// New host at cycle 0 with a full reserve bucket
    pub fn new(limit: Compute) -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                cycle: 0,
                consumed: 0.0,
                limit,
                reserve: DEFAULT_BUCKET_CAPACITY,
                bucket_capacity: DEFAULT_BUCKET_CAPACITY,
                domains: 1,
            })),
        }
    }

    /// Charge compute to the current cycle
    pub fn consume(&self, amount: Compute) {
        self.state.lock().consumed += amount.max(0.0);
    }

    /// Start the next cycle
    ///
    /// Unused allowance flows into the reserve bucket, overuse drains it.
    pub fn advance(&self) -> Cycle {
        let mut state = self.state.lock();
        let slack = state.limit - state.consumed;
        state.reserve = (state.reserve + slack).clamp(0.0, state.bucket_capacity);
        state.consumed = 0.0;
        state.cycle += 1;
        state.cycle
    }

    pub fn set_cycle(&self, cycle: Cycle) {
        self.state.lock().cycle = cycle;
    }

    pub fn set_consumed(&self, consumed: Compute) {
        self.state.lock().consumed = consumed;
    }

    pub fn set_limit(&self, limit: Compute) {
        self.state.lock().limit = limit;
    }

    pub fn set_reserve(&self, reserve: Compute) {
        let mut state = self.state.lock();
        state.reserve = reserve.clamp(0.0, state.bucket_capacity);
    }

    pub fn set_bucket_capacity(&self, capacity: Compute) {
        let mut state = self.state.lock();
        state.bucket_capacity = capacity.max(0.0);
        state.reserve = state.reserve.min(state.bucket_capacity);
    }

    pub fn set_domains(&self, domains: usize) {
        self.state.lock().domains = domains;
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Host for SimulatedHost {
    fn now(&self) -> Cycle {
        self.state.lock().cycle
    }

    fn consumed_so_far(&self) -> Compute {
        self.state.lock().consumed
    }

    fn ceiling(&self) -> Compute {
        self.state.lock().limit
    }

    fn reserve_level(&self) -> Compute {
        self.state.lock().reserve
    }

    fn active_domains(&self) -> usize {
        self.state.lock().domains
    }
}
