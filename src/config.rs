use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use greenkenya_notification::{DeliveryConfig, Provider};
use greenkenya_submission::{Mailbox, Timing};
use serde::Deserialize;
use std::{env, time::Duration};
use validator::ValidateEmail;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub mailbox: Mailbox,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub forms: FormsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct FormsConfig {
    /// Mounted forms untouched for this long are dropped on the next mount.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl FormsConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

fn default_session_ttl_secs() -> u64 {
    crate::forms::DEFAULT_SESSION_TTL.as_secs()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (GREENKENYA__DELIVERY__PROVIDER, etc.)
    /// 2. Config file specified by path, CONFIG_PATH or config/default.toml
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored if missing
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("GREENKENYA")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if !self.mailbox.recipient.validate_email() {
            return Err(format!(
                "Mailbox recipient '{}' is not a valid email address",
                self.mailbox.recipient
            ));
        }
        if !self.mailbox.chat_reply_to.validate_email() {
            return Err(format!(
                "Chat reply-to '{}' is not a valid email address",
                self.mailbox.chat_reply_to
            ));
        }
        if !(-12..=14).contains(&self.mailbox.utc_offset_hours) {
            return Err("Mailbox utc_offset_hours must be between -12 and 14".to_string());
        }
        if self.delivery.provider == Provider::EmailJs && !self.delivery.emailjs.is_complete() {
            return Err(
                "EmailJS delivery requires service_id, template_id and public_key".to_string(),
            );
        }
        if self.delivery.timeout_secs == Some(0) {
            return Err("Delivery timeout must be greater than 0 when set".to_string());
        }
        if self.forms.session_ttl_secs == 0 {
            return Err("Form session TTL must be greater than 0".to_string());
        }
        Ok(())
    }
}
