//! Tests for config module

use crate::config::{Config, McpConfig, OpenAiConfig, SupabaseConfig, Transport};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.supabase.table, "archive_items");
    assert_eq!(config.supabase.bucket, "thumbnails");
    assert_eq!(config.supabase.timeout_secs, 30);

    assert_eq!(config.openai.max_retries, 3);
    assert_eq!(config.openai.retry_delay_secs, 3);
    assert_eq!(config.openai.base_url, "https://api.openai.com/v1");

    assert_eq!(config.mcp.transport, Transport::Stdio);
    assert_eq!(config.mcp.port, 8081);
}

#[test]
fn test_supabase_is_configured() {
    let mut config = SupabaseConfig {
        url: String::new(),
        anon_key: String::new(),
        ..SupabaseConfig::default()
    };
    assert!(!config.is_configured());

    config.url = "https://example.supabase.co".to_string();
    assert!(!config.is_configured());

    config.anon_key = "  ".to_string();
    assert!(!config.is_configured());

    config.anon_key = "anon".to_string();
    assert!(config.is_configured());
}

#[test]
fn test_openai_is_configured() {
    let config = OpenAiConfig {
        api_key: String::new(),
        ..OpenAiConfig::default()
    };
    assert!(!config.is_configured());

    let config = OpenAiConfig {
        api_key: "sk-test".to_string(),
        ..OpenAiConfig::default()
    };
    assert!(config.is_configured());
}

#[test]
fn test_mcp_config_default() {
    let config = McpConfig::default();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8081);
    assert_eq!(config.admin_url, "http://localhost:3000/admin");
}

#[test]
fn test_transport_deserialize() {
    let config: McpConfig = serde_json::from_str(r#"{"transport": "http"}"#).unwrap();
    assert_eq!(config.transport, Transport::Http);
    assert_eq!(config.port, 8081);
}

#[test]
fn test_load_or_default() {
    // Should not panic even if config file doesn't exist
    let config = Config::load_or_default();
    assert_eq!(config.supabase.table, "archive_items");
}
