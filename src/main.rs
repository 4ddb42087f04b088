/*!
 * Cycle Kernel - Simulation Entry Point
 *
 * Drives the scheduler against a simulated host:
 * - Registers a handful of representative processes
 * - Runs a fixed number of cycles, advancing the host clock between them
 * - Prints the stats summary as JSON
 *
 * Environment variables:
 * - KERNEL_CONFIG: path to a JSON configuration file (optional)
 * - KERNEL_CYCLES: number of cycles to simulate (default: 200)
 */

use cycle_kernel::{
    init_tracing, FrequencyClass, Kernel, KernelConfig, Priority, ProcessSpec, SimulatedHost,
};
use miette::IntoDiagnostic;
use std::cell::Cell;
use std::rc::Rc;
use tracing::info;

const DEFAULT_CYCLES: u64 = 200;
const HOST_LIMIT: f64 = 100.0;

fn main() -> miette::Result<()> {
    init_tracing();

    let config = match std::env::var("KERNEL_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration");
            KernelConfig::from_json_file(&path)?
        }
        Err(_) => KernelConfig {
            jitter_seed: Some(7),
            ..KernelConfig::default()
        },
    };

    let cycles = std::env::var("KERNEL_CYCLES")
        .ok()
        .map(|v| v.parse::<u64>())
        .transpose()
        .into_diagnostic()?
        .unwrap_or(DEFAULT_CYCLES);

    let host = SimulatedHost::new(HOST_LIMIT);
    host.set_domains(3);

    let mut kernel = Kernel::builder(host.clone()).with_config(config).build();

    let meter = host.clone();
    kernel.register_process(
        ProcessSpec::new("defense", "tower defense", Priority::Critical, move || {
            meter.consume(8.0);
            Ok(())
        })
        .with_frequency(FrequencyClass::High),
    )?;

    let meter = host.clone();
    kernel.register_process(
        ProcessSpec::new("hauling", "logistics", Priority::High, move || {
            meter.consume(15.0);
            Ok(())
        })
        .with_frequency(FrequencyClass::High),
    )?;

    let meter = host.clone();
    let attempts = Rc::new(Cell::new(0u64));
    kernel.register_process(
        ProcessSpec::new("planner", "room planner", Priority::Medium, move || {
            meter.consume(30.0);
            attempts.set(attempts.get() + 1);
            if attempts.get() % 4 == 0 {
                anyhow::bail!("layout solver did not converge");
            }
            Ok(())
        })
        .with_frequency(FrequencyClass::Medium),
    )?;

    let meter = host.clone();
    kernel.register_process(
        ProcessSpec::new("market", "market scan", Priority::Low, move || {
            meter.consume(20.0);
            anyhow::bail!("market endpoint unavailable")
        })
        .with_tick_schedule(10, 3),
    )?;

    let meter = host.clone();
    kernel.register_process(
        ProcessSpec::new("stats", "stats export", Priority::Idle, move || {
            meter.consume(5.0);
            Ok(())
        })
        .with_frequency(FrequencyClass::Low),
    )?;

    info!(cycles, processes = kernel.process_count(), "Simulation starting");
    for _ in 0..cycles {
        host.advance();
        kernel.run();
    }

    let summary = kernel.get_stats_summary();
    let json = serde_json::to_string_pretty(&summary).into_diagnostic()?;
    println!("{}", json);

    info!(
        cycles = summary.kernel.cycles,
        executions = summary.kernel.executions,
        suspended = summary.suspended_processes,
        "Simulation complete"
    );
    Ok(())
}
