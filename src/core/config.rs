//! Configuration management for the MCP server.
//!
//! Values come from environment variables (a `.env` file is loaded first) and
//! can then be overridden by command-line arguments.

use super::transport::TransportConfig;
use crate::domains::tools::DEFAULT_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// The API the tools are generated from and call into.
    pub api: ApiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration of the proxied API.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OpenAPI document: a file path or an `http(s)` URL.
    pub spec: Option<String>,

    /// Base URL for API calls; overrides the document's first server.
    pub base_url: Option<String>,

    /// Sent as `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Register the `ping` example tool.
    pub ping_tool: bool,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("spec", &self.spec)
            .field("base_url", &self.base_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("ping_tool", &self.ping_tool)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            spec: None,
            base_url: None,
            bearer_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            ping_tool: false,
        }
    }
}

/// Values given on the command line; `None` keeps the environment value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub spec: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub ping_tool: bool,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "generated-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// `BASE_URL` is also accepted for the API base URL.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config.api.spec = non_empty_var("MCP_OPENAPI_SPEC");
        config.api.base_url =
            non_empty_var("MCP_API_BASE_URL").or_else(|| non_empty_var("BASE_URL"));
        config.api.bearer_token = non_empty_var("MCP_API_TOKEN");

        if let Some(timeout) = non_empty_var("MCP_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.api.timeout_secs = secs,
                _ => warn!(
                    "Invalid MCP_API_TIMEOUT_SECS '{}', using {} seconds",
                    timeout, DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        if let Some(ping) = non_empty_var("MCP_PING_TOOL") {
            config.api.ping_tool = parse_flag(&ping);
        }

        config
    }

    /// Apply command-line values on top of this configuration.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(spec) = overrides.spec {
            self.api.spec = Some(spec);
        }
        if let Some(base_url) = overrides.base_url {
            self.api.base_url = Some(base_url);
        }
        if let Some(secs) = overrides.timeout_secs.filter(|s| *s > 0) {
            self.api.timeout_secs = secs;
        }
        if overrides.ping_tool {
            self.api.ping_tool = true;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const API_VARS: &[&str] = &[
        "MCP_OPENAPI_SPEC",
        "MCP_API_BASE_URL",
        "BASE_URL",
        "MCP_API_TOKEN",
        "MCP_API_TIMEOUT_SECS",
        "MCP_PING_TOOL",
    ];

    fn clear_api_vars() {
        for key in API_VARS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_api_config_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_api_vars();
        unsafe {
            std::env::set_var("MCP_OPENAPI_SPEC", "openapi.yaml");
            std::env::set_var("MCP_API_BASE_URL", "https://api.example.com");
            std::env::set_var("MCP_API_TOKEN", "tok");
            std::env::set_var("MCP_API_TIMEOUT_SECS", "5");
            std::env::set_var("MCP_PING_TOOL", "true");
        }
        let config = Config::from_env();
        assert_eq!(config.api.spec.as_deref(), Some("openapi.yaml"));
        assert_eq!(config.api.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.api.bearer_token.as_deref(), Some("tok"));
        assert_eq!(config.api.timeout_secs, 5);
        assert!(config.api.ping_tool);
        clear_api_vars();
    }

    #[test]
    fn test_base_url_fallback() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_api_vars();
        unsafe {
            std::env::set_var("BASE_URL", "http://localhost:3000");
        }
        let config = Config::from_env();
        assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:3000"));
        clear_api_vars();
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_api_vars();
        unsafe {
            std::env::set_var("MCP_API_TIMEOUT_SECS", "soon");
        }
        let config = Config::from_env();
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        clear_api_vars();
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.api.base_url = Some("http://from-env".to_string());

        let config = config.with_overrides(Overrides {
            spec: Some("api.json".to_string()),
            base_url: Some("http://from-cli".to_string()),
            timeout_secs: Some(0),
            ping_tool: true,
            log_level: Some("debug".to_string()),
        });

        assert_eq!(config.api.spec.as_deref(), Some("api.json"));
        assert_eq!(config.api.base_url.as_deref(), Some("http://from-cli"));
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.api.ping_tool);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let api = ApiConfig {
            bearer_token: Some("super_secret_token".to_string()),
            ..ApiConfig::default()
        };
        let debug_str = format!("{:?}", api);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_token"));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.name, "generated-mcp");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(!config.api.ping_tool);
        assert!(config.api.spec.is_none());
    }
}
