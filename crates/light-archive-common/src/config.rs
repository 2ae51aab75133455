//! Configuration for Light Archive services

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Supabase (database + storage) configuration
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// OpenAI configuration
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// MCP server configuration
    #[serde(default)]
    pub mcp: McpConfig,
}

/// Supabase project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL (e.g., "https://xyzcompany.supabase.co")
    #[serde(default = "default_supabase_url")]
    pub url: String,

    /// Anonymous API key
    #[serde(default = "default_supabase_key")]
    pub anon_key: String,

    /// Table holding archive records
    #[serde(default = "default_table")]
    pub table: String,

    /// Storage bucket for uploaded images
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_supabase_url() -> String {
    std::env::var("NEXT_PUBLIC_SUPABASE_URL").unwrap_or_default()
}

fn default_supabase_key() -> String {
    std::env::var("NEXT_PUBLIC_SUPABASE_ANON_KEY").unwrap_or_default()
}

fn default_table() -> String {
    "archive_items".to_string()
}

fn default_bucket() -> String {
    "thumbnails".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl SupabaseConfig {
    /// Both the URL and the key are required to talk to Supabase
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: default_supabase_url(),
            anon_key: default_supabase_key(),
            table: default_table(),
            bucket: default_bucket(),
            timeout_secs: default_timeout(),
        }
    }
}

/// OpenAI chat completion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key
    #[serde(default = "default_openai_key")]
    pub api_key: String,

    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Total attempts per generation request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between attempts; attempt N waits N times this
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_openai_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_default()
}

fn default_model() -> String {
    std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    3
}

fn default_llm_timeout() -> u64 {
    60
}

impl OpenAiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: default_openai_key(),
            model: default_model(),
            base_url: default_openai_base_url(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// How the MCP server talks to its client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout
    #[default]
    Stdio,
    /// JSON over HTTP
    Http,
}

/// MCP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Transport to serve on
    #[serde(default)]
    pub transport: Transport,

    /// Host to bind to (http transport)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on (http transport)
    #[serde(default = "default_mcp_port")]
    pub port: u16,

    /// Base URL of the admin editor, used in creation responses
    #[serde(default = "default_admin_url")]
    pub admin_url: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_mcp_port() -> u16 {
    8081
}

fn default_admin_url() -> String {
    "http://localhost:3000/admin".to_string()
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_host(),
            port: default_mcp_port(),
            admin_url: default_admin_url(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, crate::Error> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name("config.local").required(false))
            .add_source(config::Environment::with_prefix("LIGHT_ARCHIVE").separator("__"))
            .build()
            .map_err(|e| crate::Error::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Load configuration with defaults (for when config file doesn't exist)
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
