use anyhow::{Context, Result};
use reviewer::conf::ModelConfig;
use serde::{Deserialize, Serialize};

/// Config file locations, lowest priority first. All optional.
const CONFIG_PATHS: [&str; 3] = [
    "/etc/logreview/gateway",
    "config/gateway",
    "crates/gateway/config/gateway",
];

pub const DEFAULT_CORALOGIX_URL: &str = "https://api.coralogix.com/api/v1";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub coralogix: CoralogixConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub request_timeout_secs: u64,
    /// Upper bound for a whole upload request body.
    pub max_upload_bytes: usize,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    File { path: String },
}

/// Coralogix search proxy. Disabled while `api_key` is unset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoralogixConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Echoed back to clients with every search page.
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CoralogixConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_CORALOGIX_URL.to_string(),
            webhook_url: None,
            timeout_secs: 10,
        }
    }
}

impl CoralogixConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl GatewayConfig {
    /// Load configuration from gateway.toml and environment variables
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Self::defaults_builder()?;

        // Layer config files (overrides defaults)
        for path in CONFIG_PATHS {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Use double underscore for nested keys: GATEWAY_SERVER__BIND_ADDRESS
        builder = builder.add_source(
            config::Environment::with_prefix("GATEWAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: GatewayConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Builder seeded with compile-time defaults so any key missing from
    /// files or env keeps its default.
    fn defaults_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = config::Config::try_from(&GatewayConfig::default())
            .context("Failed to serialize default configuration")?;
        Ok(config::Config::builder().add_source(defaults))
    }

    /// Well-known provider variables win over everything else.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.model.apply_env(&lookup);

        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(key) = non_blank("CORALOGIX_API_KEY") {
            self.coralogix.api_key = Some(key);
        }
        if let Some(url) = non_blank("CORALOGIX_BASE_URL") {
            self.coralogix.base_url = url;
        }
        if let Some(url) = non_blank("CORALOGIX_WEBHOOK_URL") {
            self.coralogix.webhook_url = Some(url);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.server
            .bind_address
            .parse::<std::net::SocketAddr>()
            .context("Invalid bind_address")?;

        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("server.request_timeout_secs must be > 0");
        }
        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("server.max_upload_bytes must be > 0");
        }

        if let LogOutput::File { path } = &self.logging.output {
            if path.trim().is_empty() {
                anyhow::bail!("logging.output.file.path must not be empty");
            }
        }

        self.model.validate().map_err(anyhow::Error::msg)?;

        if self.coralogix.is_configured() {
            let url = &self.coralogix.base_url;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("coralogix.base_url must be an http(s) URL, got: {}", url);
            }
            if self.coralogix.timeout_secs == 0 {
                anyhow::bail!("coralogix.timeout_secs must be > 0");
            }
        }

        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "0.0.0.0:8000".to_string(),
                request_timeout_secs: 120,
                max_upload_bytes: 50 * 1024 * 1024,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            logging: LoggingConfig {
                level: "info,gateway=debug,reviewer=debug".to_string(),
                format: LogFormat::Pretty,
                output: LogOutput::Stdout,
            },
            model: ModelConfig::default(),
            coralogix: CoralogixConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_toml(toml: &str) -> GatewayConfig {
        GatewayConfig::defaults_builder()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.model.is_configured());
        assert!(!config.coralogix.is_configured());
        assert_eq!(config.coralogix.base_url, DEFAULT_CORALOGIX_URL);
    }

    #[test]
    fn test_defaults_survive_round_trip_through_builder() {
        let config = from_toml("");
        assert_eq!(config.server.bind_address, "0.0.0.0:8000");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.output, LogOutput::Stdout);
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert!(config.model.api_key.is_none());
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let config = from_toml(
            r#"
[server]
bind_address = "127.0.0.1:9000"

[logging]
format = "json"

[model]
model = "gpt-4o"

[coralogix]
api_key = "cx-key"
"#,
        );
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.server.request_timeout_secs, 120);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.model.model, "gpt-4o");
        assert_eq!(config.model.api_url, reviewer::conf::model::DEFAULT_API_URL);
        assert!(config.coralogix.is_configured());
        assert_eq!(config.coralogix.timeout_secs, 10);
    }

    #[test]
    fn test_file_log_output() {
        let config = from_toml(
            r#"
[logging.output.file]
path = "/tmp/gateway.log"
"#,
        );
        assert_eq!(
            config.logging.output,
            LogOutput::File { path: "/tmp/gateway.log".to_string() }
        );
    }

    #[test]
    fn test_well_known_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-live"),
            ("OPENAI_MODEL", "gpt-4.1-mini"),
            ("CORALOGIX_API_KEY", "cx-live"),
            ("CORALOGIX_BASE_URL", "https://api.eu2.coralogix.com/api/v1"),
            ("CORALOGIX_WEBHOOK_URL", "   "),
        ]
        .into_iter()
        .collect();

        let mut config = GatewayConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.model.api_key.as_deref(), Some("sk-live"));
        assert_eq!(config.model.model, "gpt-4.1-mini");
        assert_eq!(config.model.api_url, reviewer::conf::model::DEFAULT_API_URL);
        assert_eq!(config.coralogix.api_key.as_deref(), Some("cx-live"));
        assert_eq!(config.coralogix.base_url, "https://api.eu2.coralogix.com/api/v1");
        assert!(config.coralogix.webhook_url.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = GatewayConfig::default();
        config.server.bind_address = "not-an-address".to_string();
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::default();
        config.server.max_upload_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::default();
        config.model.temperature = -1.0;
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::default();
        config.coralogix.api_key = Some("cx".to_string());
        config.coralogix.base_url = "api.coralogix.com".to_string();
        assert!(config.validate().is_err());

        let mut config = GatewayConfig::default();
        config.logging.output = LogOutput::File { path: " ".to_string() };
        assert!(config.validate().is_err());
    }
}
