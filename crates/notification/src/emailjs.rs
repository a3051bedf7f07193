//! Delivery through the EmailJS REST API.

use std::time::Duration;

use async_trait::async_trait;
use greenkenya_submission::{DeliveryChannel, DeliveryError, OutboundMessage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone)]
pub struct EmailJsConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub public_key: String,
    pub private_key: Option<String>,
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            private_key: None,
        }
    }
}

impl EmailJsConfig {
    pub fn is_complete(&self) -> bool {
        !self.service_id.is_empty() && !self.template_id.is_empty() && !self.public_key.is_empty()
    }
}

fn default_endpoint() -> String {
    "https://api.emailjs.com".to_string()
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TemplateParams<'a> {
    pub to_email: &'a str,
    pub from_name: &'a str,
    pub message: &'a str,
    pub reply_to: &'a str,
    pub subject: &'a str,
    pub timestamp: &'a str,
}

impl<'a> From<&'a OutboundMessage> for TemplateParams<'a> {
    fn from(message: &'a OutboundMessage) -> Self {
        Self {
            to_email: message.recipient(),
            from_name: message.sender_label(),
            message: message.body(),
            reply_to: message.reply_to(),
            subject: message.subject(),
            timestamp: message.timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: TemplateParams<'a>,
}

#[derive(Clone)]
pub struct EmailJsChannel {
    client: reqwest::Client,
    url: String,
    config: EmailJsConfig,
}

impl EmailJsChannel {
    /// No timeout is applied unless one is given.
    pub fn new(config: &EmailJsConfig, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        tracing::info!(
            endpoint = %config.endpoint,
            service_id = %config.service_id,
            template_id = %config.template_id,
            "EmailJS delivery initialized"
        );

        Ok(Self {
            client: builder.build()?,
            url: format!(
                "{}/api/v1.0/email/send",
                config.endpoint.trim_end_matches('/')
            ),
            config: config.clone(),
        })
    }
}

#[async_trait]
impl DeliveryChannel for EmailJsChannel {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let request = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.private_key.as_deref(),
            template_params: message.into(),
        };

        tracing::info!(
            to = %message.recipient(),
            subject = %message.subject(),
            "Sending email through EmailJS"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let reason = response.text().await.unwrap_or_default();

        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            reason,
        })
    }
}
