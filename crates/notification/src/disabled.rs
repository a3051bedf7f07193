use async_trait::async_trait;
use greenkenya_submission::{DeliveryChannel, DeliveryError, OutboundMessage};

/// Stands in when no provider is configured: every message goes straight to
/// the mail-client fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledChannel;

#[async_trait]
impl DeliveryChannel for DisabledChannel {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        tracing::warn!(
            subject = %message.subject(),
            "No delivery provider configured, message not sent"
        );

        Err(DeliveryError::Disabled)
    }
}
