/*!
 * Structured Tracing
 * Subscriber setup and per-cycle spans using the tracing crate
 */

use crate::core::types::{Compute, Cycle};
use std::time::{Duration, Instant};
use tracing::{debug, span, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Wall-clock duration above which a cycle is reported as slow
const SLOW_CYCLE: Duration = Duration::from_millis(50);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - KERNEL_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("KERNEL_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!(json = use_json, "Structured tracing initialized");
    }
}

/// Span covering one `run()` invocation
pub struct CycleSpan {
    span: tracing::Span,
    start: Instant,
    cycle: Cycle,
}

impl CycleSpan {
    pub fn new(cycle: Cycle) -> Self {
        let span = span!(
            Level::DEBUG,
            "cycle",
            cycle = cycle,
            executed = tracing::field::Empty,
            failed = tracing::field::Empty,
            cost = tracing::field::Empty,
            budget_exhausted = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            cycle,
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn record_outcome(&self, executed: usize, failed: usize, cost: Compute, budget_exhausted: bool) {
        self.span.record("executed", executed);
        self.span.record("failed", failed);
        self.span.record("cost", cost);
        self.span.record("budget_exhausted", budget_exhausted);
    }
}

impl Drop for CycleSpan {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let _entered = self.span.enter();
        if elapsed > SLOW_CYCLE {
            warn!(
                cycle = self.cycle,
                duration_ms = elapsed.as_millis() as u64,
                slow = true,
                "slow cycle detected"
            );
        } else {
            debug!(
                cycle = self.cycle,
                duration_us = elapsed.as_micros() as u64,
                "cycle completed"
            );
        }
    }
}

/// Helper to create a cycle span
#[inline]
pub fn span_cycle(cycle: Cycle) -> CycleSpan {
    CycleSpan::new(cycle)
}
