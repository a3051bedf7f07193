use askama::Template;
use serde::{Deserialize, Serialize};
use time::{
    OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{FormKind, FormState, MailtoLink, Result};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day padding:none] [month repr:long] [year] at [hour]:[minute]");

/// Where visitor messages go and how anonymous chat messages are labelled.
#[derive(Debug, Deserialize, Clone)]
pub struct Mailbox {
    #[serde(default = "default_recipient")]
    pub recipient: String,
    #[serde(default = "default_chat_sender_label")]
    pub chat_sender_label: String,
    #[serde(default = "default_chat_reply_to")]
    pub chat_reply_to: String,
    #[serde(default = "default_chat_subject")]
    pub chat_subject: String,
    #[serde(default = "default_chat_fallback_subject")]
    pub chat_fallback_subject: String,
    /// East Africa Time unless configured otherwise.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i8,
}

impl Default for Mailbox {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            chat_sender_label: default_chat_sender_label(),
            chat_reply_to: default_chat_reply_to(),
            chat_subject: default_chat_subject(),
            chat_fallback_subject: default_chat_fallback_subject(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl Mailbox {
    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC)
    }
}

fn default_recipient() -> String {
    "greenkenyainitiative985@gmail.com".to_string()
}

fn default_chat_sender_label() -> String {
    "Website Visitor".to_string()
}

fn default_chat_reply_to() -> String {
    "visitor@greenkenyainitiative.org".to_string()
}

fn default_chat_subject() -> String {
    "New Message from Green Kenya Initiative Website".to_string()
}

fn default_chat_fallback_subject() -> String {
    "Message from Green Kenya Initiative Website".to_string()
}

fn default_utc_offset_hours() -> i8 {
    3
}

#[derive(Template)]
#[template(path = "contact.txt")]
struct ContactTemplate<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "membership.txt")]
struct MembershipTemplate<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    location: &'a str,
    category: &'a str,
    interests: String,
    experience: &'a str,
    message: &'a str,
    submitted: &'a str,
    iso_timestamp: String,
}

#[derive(Template)]
#[template(path = "chat-fallback.txt")]
struct ChatFallbackTemplate<'a> {
    message: &'a str,
}

/// Snapshot of a form taken at submit time. Read-only once composed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    kind: FormKind,
    recipient: String,
    sender_label: String,
    reply_to: String,
    subject: String,
    body: String,
    timestamp: String,
    #[serde(skip)]
    fallback_subject: String,
    #[serde(skip)]
    fallback_body: String,
}

impl OutboundMessage {
    pub fn compose(form: &FormState, mailbox: &Mailbox, at: OffsetDateTime) -> Result<Self> {
        let at = at.to_offset(mailbox.utc_offset());
        let timestamp = at.format(TIMESTAMP_FORMAT)?;
        let recipient = mailbox.recipient.to_owned();

        let message = match form {
            FormState::Contact(form) => {
                let subject = form.subject.trim().to_owned();
                let body = ContactTemplate {
                    name: form.name.trim(),
                    email: form.email.trim(),
                    subject: &subject,
                    message: &form.message,
                }
                .render()?;

                Self {
                    kind: FormKind::Contact,
                    recipient,
                    sender_label: form.name.trim().to_owned(),
                    reply_to: form.email.trim().to_owned(),
                    fallback_subject: subject.to_owned(),
                    fallback_body: body.to_owned(),
                    subject,
                    body,
                    timestamp,
                }
            }
            FormState::Membership(form) => {
                let name = form.name.trim();
                let subject = format!("New Membership Application - {name}");
                let experience = match form.experience.trim() {
                    "" => "Not provided",
                    _ => &form.experience,
                };
                let body = MembershipTemplate {
                    name,
                    email: form.email.trim(),
                    phone: form.phone.trim(),
                    location: form.location.trim(),
                    category: form.category.as_ref().map_or("", |c| c.label()),
                    interests: form
                        .interests
                        .iter()
                        .map(|i| i.as_ref())
                        .collect::<Vec<_>>()
                        .join(", "),
                    experience,
                    message: &form.message,
                    submitted: &timestamp,
                    iso_timestamp: at.format(&Rfc3339)?,
                }
                .render()?;

                Self {
                    kind: FormKind::Membership,
                    recipient,
                    sender_label: name.to_owned(),
                    reply_to: form.email.trim().to_owned(),
                    fallback_subject: subject.to_owned(),
                    fallback_body: body.to_owned(),
                    subject,
                    body,
                    timestamp,
                }
            }
            FormState::Chat(form) => {
                let message = form.message.as_str();
                let fallback_body = ChatFallbackTemplate { message }.render()?;

                Self {
                    kind: FormKind::Chat,
                    recipient,
                    sender_label: mailbox.chat_sender_label.to_owned(),
                    reply_to: mailbox.chat_reply_to.to_owned(),
                    subject: mailbox.chat_subject.to_owned(),
                    body: message.to_owned(),
                    timestamp,
                    fallback_subject: mailbox.chat_fallback_subject.to_owned(),
                    fallback_body,
                }
            }
        };

        Ok(message)
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn sender_label(&self) -> &str {
        &self.sender_label
    }

    pub fn reply_to(&self) -> &str {
        &self.reply_to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn fallback_link(&self) -> MailtoLink {
        MailtoLink::new(&self.recipient, &self.fallback_subject, &self.fallback_body)
    }
}
