/*!
 * Adaptive Budget and Configuration Tests
 */

use crate::common::{config, Harness};
use cycle_kernel::{
    ConfigError, FrequencyClass, Kernel, KernelConfig, Notification, Priority, ProcessSpec,
    ReserveStatus, SimulatedHost,
};
use pretty_assertions::assert_eq;
use std::io::Write;

fn adaptive() -> KernelConfig {
    let mut config = config();
    config.adaptive.enabled = true;
    config
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_budgets_shrink_at_critical_reserve() {
    let mut h = Harness::with_config(adaptive());
    h.host.advance();
    h.host.set_reserve(100.0);
    let report = h.kernel.run();

    assert_eq!(report.reserve_status, ReserveStatus::Critical);
    let table = h.kernel.budget_table();
    assert!(approx(table.high.cpu_budget, 0.05));
    assert!(approx(table.medium.cpu_budget, 0.025));
    assert!(approx(table.low.cpu_budget, 0.01));
    // Intervals and reserves are not planned
    assert_eq!(table.medium.interval, 5);
}

#[test]
fn test_budgets_grow_with_domains_and_high_reserve() {
    let mut h = Harness::with_config(adaptive());
    h.host.set_domains(4);
    h.step();

    // Full bucket is High reserve: (1 + 0.25 ln 4) * 1.25
    let expected = 0.10 * (1.0 + 0.25 * 4f64.ln()) * 1.25;
    assert!(approx(h.kernel.budget_table().high.cpu_budget, expected));
}

#[test]
fn test_domain_scale_is_capped() {
    let mut h = Harness::with_config(adaptive());
    h.host.set_domains(1_000_000);
    h.host.advance();
    h.host.set_reserve(5000.0);
    h.kernel.run();

    assert!(approx(h.kernel.budget_table().high.cpu_budget, 0.10 * 2.0));
}

#[test]
fn test_explicit_budget_not_replanned() {
    let mut h = Harness::with_config(adaptive());
    h.kernel
        .register_process(
            ProcessSpec::new("pinned", "pinned", Priority::High, || Ok(()))
                .with_frequency(FrequencyClass::High)
                .with_cpu_budget(0.3),
        )
        .unwrap();
    h.kernel
        .register_process(
            ProcessSpec::new("floating", "floating", Priority::High, || Ok(()))
                .with_frequency(FrequencyClass::High),
        )
        .unwrap();

    h.host.advance();
    h.host.set_reserve(100.0);
    h.kernel.run();

    assert_eq!(h.kernel.get_process("pinned").unwrap().cpu_budget, 0.3);
    assert!(approx(
        h.kernel.get_process("floating").unwrap().cpu_budget,
        0.05
    ));
}

#[test]
fn test_static_budgets_when_disabled() {
    let mut h = Harness::new();
    h.host.advance();
    h.host.set_reserve(100.0);
    h.kernel.run();
    assert_eq!(h.kernel.budget_table().high.cpu_budget, 0.10);
}

#[test]
fn test_overrun_counted_not_blocking() {
    let mut h = Harness::new();
    let host = h.host.clone();
    h.kernel
        .register_process(
            ProcessSpec::new("hog", "hog", Priority::High, move || {
                host.consume(40.0);
                Ok(())
            })
            .with_interval(1)
            .with_min_reserve(0.0)
            .with_cpu_budget(0.1),
        )
        .unwrap();

    // Limit is 100 * 0.1 * 1.5 = 15
    h.run_through(3);
    let view = h.kernel.get_process("hog").unwrap();
    assert_eq!(view.stats.overrun_count, 3);
    assert_eq!(view.stats.run_count, 3);
    assert_eq!(view.stats.suspension, None);
}

#[test]
fn test_config_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "target_utilization": 0.5,
            "reserved_fraction": 0.1,
            "reserve_thresholds": {{ "critical": 3000, "low": 1000, "high": 9000 }},
            "frequency_defaults": {{
                "high": {{ "interval": 2, "min_reserve": 0, "cpu_budget": 0.2 }}
            }},
            "jitter_seed": 3
        }}"#
    )
    .unwrap();

    let loaded = KernelConfig::from_json_file(file.path()).unwrap();
    let kernel = Kernel::builder(SimulatedHost::new(100.0))
        .with_config(loaded)
        .build();

    let config = kernel.config();
    assert_eq!(config.target_utilization, 0.5);
    assert_eq!(config.reserved_fraction, 0.1);
    assert_eq!(config.frequency_defaults.high.interval, 2);
    assert_eq!(config.frequency_defaults.low.interval, 20);
    assert_eq!(config.jitter_seed, Some(3));

    // Inverted thresholds are corrected at construction
    let thresholds = config.reserve_thresholds;
    assert_eq!(
        (thresholds.critical, thresholds.low, thresholds.high),
        (1000.0, 3000.0, 9000.0)
    );
}

#[test]
fn test_target_utilization_scales_ceiling() {
    let mut config = config();
    config.target_utilization = 0.5;
    let mut h = Harness::with_config(config);
    let host = h.host.clone();
    h.kernel
        .register_process(
            ProcessSpec::new("p", "p", Priority::High, || Ok(()))
                .with_interval(1)
                .with_min_reserve(0.0),
        )
        .unwrap();

    // Ceiling 50, floor 1: 49 consumed closes the gate
    host.advance();
    host.set_consumed(49.0);
    assert!(h.kernel.run().budget_exhausted);

    host.advance();
    host.set_consumed(48.0);
    assert_eq!(h.kernel.run().executed, 1);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = KernelConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_malformed_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let err = KernelConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_flume_sink_delivers_notifications() {
    let (tx, rx) = flume::unbounded::<Notification>();
    let mut kernel = Kernel::builder(SimulatedHost::new(100.0))
        .with_config(config())
        .with_sink(tx)
        .build();
    kernel
        .register_process(ProcessSpec::new("p", "p", Priority::Low, || Ok(())))
        .unwrap();

    assert!(kernel.suspend_process("p"));
    assert!(kernel.resume_process("p"));

    let topics: Vec<&str> = rx.try_iter().map(|n| n.topic()).collect();
    assert_eq!(topics, vec!["process.suspended", "process.recovered"]);
}

#[test]
fn test_notification_wire_shape() {
    let (tx, rx) = flume::unbounded::<Notification>();
    let mut kernel = Kernel::builder(SimulatedHost::new(100.0))
        .with_config(config())
        .with_sink(tx)
        .build();
    kernel
        .register_process(ProcessSpec::new("p", "sampler", Priority::Low, || Ok(())))
        .unwrap();
    kernel.suspend_process("p");

    let json = serde_json::to_value(rx.recv().unwrap()).unwrap();
    assert_eq!(json["topic"], "process.suspended");
    assert_eq!(json["id"], "p");
    assert_eq!(json["name"], "sampler");
    assert_eq!(json["permanent"], true);
    assert!(json.get("resume_at_cycle").is_none());
}

#[test]
fn test_dropped_receiver_does_not_disrupt_kernel() {
    let (tx, rx) = flume::unbounded::<Notification>();
    drop(rx);
    let mut kernel = Kernel::builder(SimulatedHost::new(100.0))
        .with_config(config())
        .with_sink(tx)
        .build();
    kernel
        .register_process(ProcessSpec::new("p", "p", Priority::Low, || Ok(())))
        .unwrap();
    assert!(kernel.suspend_process("p"));
    assert!(kernel.resume_process("p"));
}
