/*!
 * Process Executor
 * Invokes work callbacks, meters their cost and contains their failures
 */

use crate::core::errors::WorkError;
use crate::core::types::Compute;
use crate::host::Host;
use crate::process::{Process, ProcessState};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Meter delta across the call
    pub cost: Compute,
    /// Wall-clock time, diagnostic only
    pub elapsed: Duration,
    pub outcome: Result<(), WorkError>,
}

impl Execution {
    #[inline]
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runs work callbacks to completion; errors and panics never escape
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute<H: Host + ?Sized>(&self, host: &H, process: &mut Process) -> Execution {
        let started = Instant::now();
        let meter_before = host.consumed_so_far();
        process.state = ProcessState::Running;

        let result = panic::catch_unwind(AssertUnwindSafe(|| (process.work)()));

        let meter_after = host.consumed_so_far();
        process.state = ProcessState::Idle;

        let outcome = match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(WorkError::from_anyhow(&err)),
            Err(payload) => Err(WorkError::Panicked(panic_message(payload.as_ref()))),
        };

        let execution = Execution {
            cost: (meter_after - meter_before).max(0.0),
            elapsed: started.elapsed(),
            outcome,
        };

        debug!(
            process = %process.id,
            cost = execution.cost,
            elapsed_us = execution.elapsed.as_micros() as u64,
            ok = execution.succeeded(),
            "Process executed"
        );

        execution
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
