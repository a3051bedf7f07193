mod disabled;
mod emailjs;
mod service;

use std::{sync::Arc, time::Duration};

use greenkenya_submission::DeliveryChannel;
use serde::Deserialize;

pub use disabled::*;
pub use emailjs::*;
pub use service::*;

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "emailjs")]
    EmailJs,
    Smtp,
    #[default]
    Disabled,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub provider: Provider,
    /// Unset means the request waits for the provider indefinitely.
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub emailjs: EmailJsConfig,
    #[serde(default)]
    pub smtp: EmailConfig,
}

/// Builds the delivery channel selected by `config.provider`.
pub fn build_channel(config: &DeliveryConfig) -> anyhow::Result<Arc<dyn DeliveryChannel>> {
    let channel: Arc<dyn DeliveryChannel> = match config.provider {
        Provider::EmailJs => Arc::new(EmailJsChannel::new(
            &config.emailjs,
            config.timeout_secs.map(Duration::from_secs),
        )?),
        Provider::Smtp => Arc::new(EmailService::new(&config.smtp)?),
        Provider::Disabled => {
            tracing::warn!("Delivery disabled, every submission falls back to the mail client");
            Arc::new(DisabledChannel)
        }
    };

    Ok(channel)
}
