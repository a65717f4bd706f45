use super::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_env_override_derives_subfolders() {
    let config = resolve_config_with(env_of(&[(ENV_MAILBOX_FOLDER, "/tmp/mcp_test")]), None)
        .unwrap();

    assert_eq!(config.base_folder(), Path::new("/tmp/mcp_test"));
    assert_eq!(config.requests_folder(), Path::new("/tmp/mcp_test/requests"));
    assert_eq!(config.responses_folder(), Path::new("/tmp/mcp_test/responses"));
    assert_eq!(
        config.info_file(),
        Path::new("/tmp/mcp_test/ae-mcp-info.json")
    );
}

#[test]
fn test_default_folder_under_home_documents() {
    let config =
        resolve_config_with(env_of(&[]), Some(PathBuf::from("/home/someone"))).unwrap();

    assert_eq!(
        config.base_folder(),
        Path::new("/home/someone/Documents/AE-MCP")
    );
    assert_eq!(
        config.requests_folder(),
        Path::new("/home/someone/Documents/AE-MCP/requests")
    );
}

#[test]
fn test_env_override_wins_over_home() {
    let config = resolve_config_with(
        env_of(&[(ENV_MAILBOX_FOLDER, "/srv/mailbox")]),
        Some(PathBuf::from("/home/someone")),
    )
    .unwrap();
    assert_eq!(config.base_folder(), Path::new("/srv/mailbox"));
}

#[test]
fn test_empty_override_is_ignored() {
    let config = resolve_config_with(
        env_of(&[(ENV_MAILBOX_FOLDER, "  ")]),
        Some(PathBuf::from("/home/someone")),
    )
    .unwrap();
    assert_eq!(
        config.base_folder(),
        Path::new("/home/someone/Documents/AE-MCP")
    );
}

#[test]
fn test_no_home_and_no_override_is_config_error() {
    let err = resolve_config_with(env_of(&[]), None).unwrap_err();
    assert_eq!(err.phase(), "config");
    assert!(err.to_string().contains(ENV_MAILBOX_FOLDER));
}

#[test]
fn test_request_and_response_paths_share_id() {
    let config = MailboxConfig::from_base("/tmp/box");
    assert_eq!(
        config.request_path("rs_1_2_3"),
        PathBuf::from("/tmp/box/requests/rs_1_2_3.json")
    );
    assert_eq!(
        config.response_path("rs_1_2_3"),
        PathBuf::from("/tmp/box/responses/rs_1_2_3.json")
    );
}

#[test]
fn test_settings_defaults() {
    let settings = BridgeSettings::default();
    assert_eq!(settings.poll_interval(), Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
    assert_eq!(settings.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_deserialize_with_missing_fields() {
    let settings: BridgeSettings = serde_json::from_str(r#"{"timeoutMs": 5000}"#).unwrap();
    assert_eq!(settings.timeout_ms, 5000);
    assert_eq!(settings.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
}

#[test]
fn test_settings_reject_zero_interval() {
    let err = BridgeSettings::new(Duration::ZERO, Duration::from_secs(1)).unwrap_err();
    assert_eq!(err.phase(), "config");
}

#[test]
fn test_settings_reject_interval_longer_than_timeout() {
    let err =
        BridgeSettings::new(Duration::from_secs(2), Duration::from_secs(1)).unwrap_err();
    assert!(err.to_string().contains("exceeds timeout"));
}
