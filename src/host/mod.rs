/*!
 * Host Adapter
 * Clock and compute meter exposed by the host simulation
 */

mod simulated;

pub use simulated::SimulatedHost;

use crate::core::types::{Compute, Cycle};

/// Clock & meter collaborator consumed by the kernel
///
/// The kernel never advances the clock or refills the reserve; both are the
/// host's responsibility between cycles.
#[cfg_attr(test, mockall::automock)]
pub trait Host {
    /// Monotonically increasing cycle counter
    fn now(&self) -> Cycle;

    /// Compute consumed so far in the current cycle
    fn consumed_so_far(&self) -> Compute;

    /// Raw compute ceiling for the current cycle
    fn ceiling(&self) -> Compute;

    /// Cross-cycle reserve gauge (leaky bucket)
    fn reserve_level(&self) -> Compute;

    /// Number of active domains, used for adaptive budgeting
    fn active_domains(&self) -> usize {
        1
    }
}

/// Per-cycle view of the host taken at the start of `run()`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSnapshot {
    pub now: Cycle,
    pub ceiling: Compute,
    pub reserve: Compute,
    pub domains: usize,
}

impl ClockSnapshot {
    /// Read the host, scaling its ceiling by the target utilization
    pub fn capture<H: Host + ?Sized>(host: &H, target_utilization: f64) -> Self {
        Self {
            now: host.now(),
            ceiling: host.ceiling() * target_utilization,
            reserve: host.reserve_level(),
            domains: host.active_domains(),
        }
    }
}
