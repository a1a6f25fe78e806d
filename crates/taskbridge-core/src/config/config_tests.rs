#![allow(non_snake_case)]

use super::*;

#[test]
fn BridgeConfig___default___has_expected_values() {
    let config = BridgeConfig::default();

    assert!(config.worker_threads.is_none());
    assert_eq!(config.thread_name, "taskbridge-worker");
    assert_eq!(config.max_blocking_threads, 512);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.shutdown_timeout_ms, 5000);
}

#[test]
fn BridgeConfig___from_empty_bytes___returns_defaults() {
    let config = BridgeConfig::from_json(&[]).unwrap();

    assert_eq!(config, BridgeConfig::default());
}

#[test]
fn BridgeConfig___from_json___parses_worker_threads() {
    let json = r#"{"worker_threads": 4}"#;

    let config = BridgeConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.worker_threads, Some(4));
}

#[test]
fn BridgeConfig___from_json___invalid_json_returns_serialization_error() {
    let result = BridgeConfig::from_json(b"{not json");

    assert!(matches!(result, Err(BridgeError::Serialization(_))));
}

#[test]
fn BridgeConfig___from_json___zero_workers_rejected() {
    let result = BridgeConfig::from_json(br#"{"worker_threads": 0}"#);

    assert!(matches!(result, Err(BridgeError::Config(_))));
}

#[test]
fn BridgeConfig___from_json___unknown_log_level_rejected() {
    let result = BridgeConfig::from_json(br#"{"log_level": "chatty"}"#);

    assert!(matches!(result, Err(BridgeError::Config(_))));
}

#[test]
fn BridgeConfig___from_toml___parses_all_fields() {
    let text = r#"
worker_threads = 2
thread_name = "native"
max_blocking_threads = 8
log_level = "debug"
shutdown_timeout_ms = 250
"#;

    let config = BridgeConfig::from_toml(text).unwrap();

    assert_eq!(config.worker_threads, Some(2));
    assert_eq!(config.thread_name, "native");
    assert_eq!(config.max_blocking_threads, 8);
    assert_eq!(config.level().unwrap(), LogLevel::Debug);
    assert_eq!(config.shutdown_timeout(), Duration::from_millis(250));
}

#[test]
fn BridgeConfig___from_toml___empty_text_returns_defaults() {
    let config = BridgeConfig::from_toml("").unwrap();

    assert_eq!(config, BridgeConfig::default());
}

#[test]
fn BridgeConfig___builder_chain___combines_options() {
    let config = BridgeConfig::new()
        .with_worker_threads(3)
        .with_thread_name("bridge")
        .with_log_level(LogLevel::Warn);

    assert_eq!(config.worker_threads, Some(3));
    assert_eq!(config.thread_name, "bridge");
    assert_eq!(config.log_level, "warn");
    assert!(config.validate().is_ok());
}
