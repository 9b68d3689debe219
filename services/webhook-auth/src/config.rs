use std::{env, fmt, net::SocketAddr};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use crate::credentials::TokenMapping;

pub const STREAM_KEYS_ENV: &str = "WEBHOOK_ENABLED_STREAMKEYS";

#[derive(Clone)]
pub struct WebhookConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Raw `token:streamKey` list; see [`TokenMapping::parse`].
    pub enabled_stream_keys: String,
    pub redact_credentials: bool,
    pub log_level: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            enabled_stream_keys: String::new(),
            redact_credentials: false,
            log_level: "info".to_string(),
        }
    }
}

impl WebhookConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = WebhookConfig::default();

        if let Ok(host) = env::var("WEBHOOK_HOST") {
            if !host.trim().is_empty() {
                config.server_host = host;
            }
        }

        if let Ok(port) = env::var("WEBHOOK_PORT") {
            config.server_port = port
                .parse::<u16>()
                .context("failed to parse WEBHOOK_PORT as u16")?;
        }

        if let Ok(keys) = env::var(STREAM_KEYS_ENV) {
            config.enabled_stream_keys = keys;
        }

        if let Ok(flag) = env::var("WEBHOOK_REDACT_CREDENTIALS") {
            config.redact_credentials = parse_bool(&flag)
                .context("failed to parse WEBHOOK_REDACT_CREDENTIALS as bool")?;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            if !level.trim().is_empty() {
                config.log_level = level;
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_host.trim().is_empty() {
            return Err(anyhow!("server host must not be empty"));
        }
        self.bind_addr()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server_host, self.server_port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid server bind address '{}:{}'",
                    self.server_host, self.server_port
                )
            })
    }

    pub fn token_mapping(&self) -> TokenMapping {
        let mapping = TokenMapping::parse(&self.enabled_stream_keys);
        if mapping.is_empty() {
            warn!(
                env = STREAM_KEYS_ENV,
                "no stream keys configured; every admission will be denied"
            );
        } else {
            info!(entries = mapping.len(), "stream key mapping loaded");
        }
        mapping
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("enabled_stream_keys", &"<redacted>")
            .field("redact_credentials", &self.redact_credentials)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    value.parse::<bool>().or_else(|_| match value {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(anyhow!("invalid boolean value: {}", other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let config = WebhookConfig::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:8000");
        assert!(config.token_mapping().is_empty());
    }

    #[test]
    fn rejects_unparsable_host() {
        let config = WebhookConfig {
            server_host: "not a host".to_string(),
            ..WebhookConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WebhookConfig {
            server_host: "  ".to_string(),
            ..WebhookConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_bool_accepts_numeric_flags() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn token_mapping_parses_raw_keys() {
        let config = WebhookConfig {
            enabled_stream_keys: "token1:streamkey1, token2:streamkey2".to_string(),
            ..WebhookConfig::default()
        };
        let mapping = config.token_mapping();
        assert_eq!(mapping.stream_key_for("token2"), Some("streamkey2"));
    }

    #[test]
    fn debug_output_hides_stream_keys() {
        let config = WebhookConfig {
            enabled_stream_keys: "secret:key".to_string(),
            ..WebhookConfig::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
