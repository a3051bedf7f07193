//! Seams to the outside world: the email delivery service and the visitor's
//! mail client.

use async_trait::async_trait;

use crate::{MailtoLink, OutboundMessage};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery channel is not configured")]
    Disabled,

    #[error("delivery service rejected the message ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("delivery transport failed: {0}")]
    Transport(String),

    #[error("invalid address: {0}")]
    Address(String),
}

/// Sends an [`OutboundMessage`] on the organisation's behalf.
///
/// Implementations make exactly one attempt per call and never retry.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

/// Hands the fallback deep link to whatever can open a mail client.
pub trait FallbackOpener: Send + Sync {
    fn open(&self, link: &MailtoLink);
}

/// Leaves opening the link to the client polling the session.
///
/// The link carries the visitor's details, so only the recipient is logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientHandoff;

impl FallbackOpener for ClientHandoff {
    fn open(&self, link: &MailtoLink) {
        tracing::info!(recipient = %link.recipient(), "Fallback link offered to client");
    }
}
