//! Submission flow for the visitor forms of the Green Kenya Initiative site:
//! contact, membership application and the chat widget.
//!
//! A form is validated, snapshotted into an [`OutboundMessage`], handed to a
//! [`DeliveryChannel`] once, and on failure turned into a `mailto:`
//! [`MailtoLink`] for the visitor's own mail client.

mod channel;
mod error;
mod flow;
mod form;
mod mailto;
mod message;
mod session;
mod status;

pub use channel::*;
pub use error::*;
pub use flow::*;
pub use form::*;
pub use mailto::*;
pub use message::*;
pub use session::*;
pub use status::*;
