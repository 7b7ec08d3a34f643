use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use healthy_route_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use healthy_route_client::{Config, ConfigLocation, Error};

fn write_config(name: &str, value: serde_json::Value) -> PathBuf {
    let mut cfg_path = PathBuf::from("target");
    fs::create_dir_all(&cfg_path).ok();
    cfg_path.push(name);
    fs::write(&cfg_path, serde_json::to_string(&value).unwrap()).unwrap();
    cfg_path
}

#[test]
fn file_config_fills_defaults() {
    let path = write_config("unit-config-defaults.json", serde_json::json!({}));
    let cfg = Config::load(ConfigLocation::File(path.to_string_lossy().to_string()))
        .expect("cfg file");
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    assert!(cfg.storage_dir.is_none());
}

#[test]
fn file_config_reads_explicit_values() {
    let path = write_config(
        "unit-config-explicit.json",
        serde_json::json!({
            "base_url": "https://routes.example.com/api",
            "timeout_ms": 2500,
            "storage_dir": "target/creds",
            "user_agent": "route-planner/2"
        }),
    );
    let cfg = Config::from_file(&path).expect("cfg file");
    assert_eq!(cfg.base_url, "https://routes.example.com/api");
    assert_eq!(cfg.timeout_ms, 2500);
    assert_eq!(cfg.storage_dir, Some(PathBuf::from("target/creds")));
    assert_eq!(cfg.user_agent.as_deref(), Some("route-planner/2"));
}

#[test]
fn zero_timeout_is_rejected() {
    let path = write_config(
        "unit-config-zero-timeout.json",
        serde_json::json!({"timeout_ms": 0}),
    );
    match Config::from_file(&path) {
        Err(Error::Config(msg)) => assert!(msg.contains("timeout_ms")),
        other => panic!("expected Error::Config, got {:?}", other.map(|c| c.base_url)),
    }
}
