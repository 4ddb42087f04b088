/*!
 * Scheduling Tests
 * Due checks, priority order, reserve gate, budget gate and fairness
 */

use crate::common::{CallLog, Harness};
use cycle_kernel::{Host, Priority, ProcessSpec, SimulatedHost};
use pretty_assertions::assert_eq;

/// Logs `(cycle, id)` and charges `cost` to the host meter
fn logged(id: &str, priority: Priority, cost: f64, host: &SimulatedHost, log: &CallLog) -> ProcessSpec {
    let host = host.clone();
    let log = log.clone();
    let name = id.to_string();
    ProcessSpec::new(id, id, priority, move || {
        log.push(host.now(), &name);
        host.consume(cost);
        Ok(())
    })
    .with_interval(1)
    .with_min_reserve(0.0)
}

#[test]
fn test_fixed_phase_ignores_interval() {
    let mut h = Harness::new();
    let log = CallLog::new();
    h.kernel
        .register_process(logged("phase", Priority::High, 1.0, &h.host, &log).with_tick_schedule(5, 2))
        .unwrap();

    h.run_through(20);
    assert_eq!(log.cycles(), vec![3, 8, 13, 18]);
}

#[test]
fn test_interval_spacing() {
    let mut h = Harness::new();
    let log = CallLog::new();
    h.kernel
        .register_process(logged("p", Priority::High, 1.0, &h.host, &log).with_interval(3))
        .unwrap();

    h.run_through(10);
    assert_eq!(log.cycles(), vec![1, 4, 7, 10]);
}

#[test]
fn test_priority_order_within_cycle() {
    let mut h = Harness::new();
    let log = CallLog::new();
    h.kernel
        .register_process(logged("idle", Priority::Idle, 1.0, &h.host, &log))
        .unwrap();
    h.kernel
        .register_process(logged("high-1", Priority::High, 1.0, &h.host, &log))
        .unwrap();
    h.kernel
        .register_process(logged("critical", Priority::Critical, 1.0, &h.host, &log))
        .unwrap();
    h.kernel
        .register_process(logged("high-2", Priority::High, 1.0, &h.host, &log))
        .unwrap();

    h.step();
    assert_eq!(log.ids_on(1), vec!["critical", "high-1", "high-2", "idle"]);

    let listed: Vec<String> = h
        .kernel
        .get_processes()
        .iter()
        .map(|v| v.id.to_string())
        .collect();
    assert_eq!(listed, vec!["critical", "high-1", "high-2", "idle"]);
}

#[test]
fn test_budget_gate_stops_loop() {
    let mut h = Harness::new();
    let log = CallLog::new();
    h.kernel
        .register_process(logged("a", Priority::Critical, 1.0, &h.host, &log))
        .unwrap();
    h.kernel
        .register_process(logged("b", Priority::Low, 1.0, &h.host, &log))
        .unwrap();

    h.host.advance();
    h.host.set_consumed(99.0);
    let report = h.kernel.run();

    assert_eq!(log.len(), 0);
    assert!(report.budget_exhausted);
    assert_eq!(report.executed, 0);
    assert_eq!(report.deferred, 2);

    // Deferral carries no penalty
    let b = h.kernel.get_process("b").unwrap();
    assert_eq!(b.stats.skipped_count, 0);
    assert_eq!(b.stats.error_count, 0);
}

#[test]
fn test_budget_gate_counts_the_floor() {
    let mut h = Harness::new();
    let log = CallLog::new();
    h.kernel
        .register_process(logged("a", Priority::Critical, 1.0, &h.host, &log))
        .unwrap();

    // 97 + 2 < 100 still admits; 98 + 2 does not
    h.host.advance();
    h.host.set_consumed(97.0);
    assert_eq!(h.kernel.run().executed, 1);

    h.host.advance();
    h.host.set_consumed(98.0);
    assert!(h.kernel.run().budget_exhausted);
}

#[test]
fn test_deferred_peer_considered_first_within_band() {
    let mut h = Harness::new();
    let log = CallLog::new();
    for id in ["a", "b", "c"] {
        h.kernel
            .register_process(logged(id, Priority::Medium, 50.0, &h.host, &log))
            .unwrap();
    }

    let first = h.step();
    assert_eq!(log.ids_on(1), vec!["a", "b"]);
    assert!(first.budget_exhausted);
    assert_eq!(first.deferred, 1);

    let second = h.step();
    assert_eq!(log.ids_on(2), vec!["c", "a"]);
    assert_eq!(second.deferred, 1);

    h.step();
    assert_eq!(log.ids_on(3), vec!["b", "c"]);

    // Every process ran twice in three saturated cycles
    for id in ["a", "b", "c"] {
        assert_eq!(h.kernel.get_process(id).unwrap().stats.run_count, 2);
    }
}

#[test]
fn test_deferral_never_preempts_higher_priority() {
    let mut h = Harness::new();
    let log = CallLog::new();
    h.kernel
        .register_process(logged("crit", Priority::Critical, 98.5, &h.host, &log))
        .unwrap();
    h.kernel
        .register_process(logged("low", Priority::Low, 1.0, &h.host, &log))
        .unwrap();

    for cycle in 1..=3 {
        let report = h.step();
        assert_eq!(log.ids_on(cycle), vec!["crit"]);
        assert_eq!(report.deferred, 1);
    }
    assert_eq!(h.kernel.get_process("low").unwrap().stats.run_count, 0);
}

#[test]
fn test_deferred_process_leads_its_band_behind_higher_priority() {
    let mut h = Harness::new();
    let log = CallLog::new();
    for (id, priority, cost) in [
        ("crit", Priority::Critical, 50.0),
        ("low-a", Priority::Low, 48.0),
        ("low-b", Priority::Low, 10.0),
        ("idle", Priority::Idle, 1.0),
    ] {
        h.kernel
            .register_process(logged(id, priority, cost, &h.host, &log))
            .unwrap();
    }

    let first = h.step();
    assert_eq!(log.ids_on(1), vec!["crit", "low-a"]);
    assert_eq!(first.deferred, 2);

    // low-b was deferred: Critical still first, low-b ahead of its peer
    let second = h.step();
    assert_eq!(log.ids_on(2), vec!["crit", "low-b", "low-a"]);
    assert_eq!(second.deferred, 1);

    h.step();
    assert_eq!(log.ids_on(3), vec!["crit", "low-a"]);
}

#[test]
fn test_full_pass_restarts_from_head() {
    let mut h = Harness::new();
    let log = CallLog::new();
    for (id, priority) in [("a", Priority::Critical), ("b", Priority::High)] {
        h.kernel
            .register_process(logged(id, priority, 60.0, &h.host, &log))
            .unwrap();
    }

    h.step();
    assert_eq!(log.ids_on(1), vec!["a", "b"]);
    // Overrunning the ceiling with the last process still completes the pass
    h.step();
    assert_eq!(log.ids_on(2), vec!["a", "b"]);
}

#[test]
fn test_unregistering_deferred_process_resets_cursor() {
    let mut h = Harness::new();
    let log = CallLog::new();
    for id in ["a", "b", "c"] {
        h.kernel
            .register_process(logged(id, Priority::Medium, 50.0, &h.host, &log))
            .unwrap();
    }

    h.step();
    assert!(h.kernel.unregister_process("c"));
    h.step();
    assert_eq!(log.ids_on(2), vec!["a", "b"]);
}

#[test]
fn test_reserve_gate_skips_without_suspending() {
    let mut h = Harness::new();
    let log = CallLog::new();
    h.kernel
        .register_process(logged("p", Priority::High, 1.0, &h.host, &log).with_min_reserve(1000.0))
        .unwrap();

    h.host.advance();
    h.host.set_reserve(500.0);
    let report = h.kernel.run();
    assert_eq!(report.skipped_reserve, 1);
    assert_eq!(log.len(), 0);

    let view = h.kernel.get_process("p").unwrap();
    assert_eq!(view.stats.skipped_count, 1);
    assert_eq!(view.stats.suspension, None);
    assert!(h.sink.is_empty());

    h.host.advance();
    h.host.set_reserve(5000.0);
    assert_eq!(h.kernel.run().executed, 1);
    assert_eq!(log.len(), 1);
}

#[test]
fn test_not_due_processes_counted() {
    let mut h = Harness::new();
    let log = CallLog::new();
    h.kernel
        .register_process(logged("p", Priority::High, 1.0, &h.host, &log).with_interval(4))
        .unwrap();

    assert_eq!(h.step().executed, 1);
    let report = h.step();
    assert_eq!(report.executed, 0);
    assert_eq!(report.not_due, 1);
}

#[test]
fn test_cycle_cost_tracks_meter() {
    let mut h = Harness::new();
    let log = CallLog::new();
    h.kernel
        .register_process(logged("a", Priority::High, 12.0, &h.host, &log))
        .unwrap();
    h.kernel
        .register_process(logged("b", Priority::Low, 8.0, &h.host, &log))
        .unwrap();

    let report = h.step();
    assert_eq!(report.cost, 20.0);

    let a = h.kernel.get_process("a").unwrap();
    assert_eq!(a.stats.total_cost, 12.0);
    assert_eq!(a.stats.peak_cost, 12.0);
    assert_eq!(a.stats.average_cost, 12.0);
    assert_eq!(h.kernel.kernel_stats().total_cost, 20.0);
}
