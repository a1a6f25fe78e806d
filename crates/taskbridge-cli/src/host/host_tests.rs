#![allow(non_snake_case)]

use super::*;
use taskbridge_loop::HostErrorKind;
use std::time::Instant;
use taskbridge_workloads::{StrQueue, do_work, return_int, sleep, throw_exception};

fn host() -> Host {
    Host::new(&BridgeConfig::default().with_worker_threads(1)).unwrap()
}

#[test]
fn Host___run___returns_task_value() {
    let mut host = host();

    let outcome = host.run(return_int(5)).unwrap();

    assert_eq!(outcome, Ok(HostValue::Int(5)));
    host.finish();
}

#[test]
fn Host___new___registers_workload_errors() {
    let mut host = host();

    let outcome = host.run(throw_exception(2)).unwrap();

    assert_eq!(
        *outcome.unwrap_err().kind(),
        HostErrorKind::Registered("MyException".to_string())
    );
    host.finish();
}

#[test]
fn Host___run_with_timeout___cancels_slow_task() {
    let mut host = host();

    let outcome = host
        .run_with_timeout(sleep(0.2), Duration::from_millis(10))
        .unwrap();

    assert_eq!(*outcome.unwrap_err().kind(), HostErrorKind::TimeoutError);
    host.finish();
    assert_eq!(host.bridge().active_bridges(), 0);
}

#[test]
fn Host___new___invalid_config_fails() {
    let config = BridgeConfig {
        max_blocking_threads: 0,
        ..Default::default()
    };

    assert!(Host::new(&config).is_err());
}

#[test]
fn Host___start___after_finish_fails() {
    let mut host = host();
    host.finish();

    assert!(host.start(return_int(1)).is_err());
}

#[test]
fn Host___finish___drained_bridges_report_true() {
    let mut host = host();
    host.run(return_int(1)).unwrap();

    assert!(host.finish());
}

#[test]
fn Host___finish___gives_up_after_shutdown_timeout() {
    let config = BridgeConfig {
        shutdown_timeout_ms: 50,
        ..BridgeConfig::default().with_worker_threads(1)
    };
    let mut host = Host::new(&config).unwrap();
    let queue = StrQueue::new(1).unwrap();
    host.start(do_work(queue)).unwrap();
    let started = Instant::now();

    let drained = host.finish();

    assert!(!drained);
    assert_eq!(host.bridge().active_bridges(), 1);
    assert!(started.elapsed() < Duration::from_secs(5));
}
