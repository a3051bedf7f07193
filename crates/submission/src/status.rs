use serde::Serialize;
use strum::{AsRefStr, Display};

/// Outcome of the most recent submit attempt of a mounted form.
#[derive(AsRefStr, Display, Default, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Sending,
    Success,
    Error,
    FallbackOffered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Submit,
    Ack,
    Reject,
    DisplayElapsed,
    FallbackElapsed,
}

impl SubmissionStatus {
    /// Pure transition table. Pairs not listed leave the status unchanged.
    ///
    /// ```text
    /// Idle|Success|Error|FallbackOffered --Submit--> Sending
    /// Sending --Ack--> Success --DisplayElapsed--> Idle
    /// Sending --Reject--> Error --FallbackElapsed--> FallbackOffered
    /// ```
    pub fn on(self, event: Event) -> Self {
        match (self, event) {
            (_, Event::Submit) => Self::Sending,
            (Self::Sending, Event::Ack) => Self::Success,
            (Self::Sending, Event::Reject) => Self::Error,
            (Self::Success, Event::DisplayElapsed) => Self::Idle,
            (Self::Error, Event::FallbackElapsed) => Self::FallbackOffered,
            (status, _) => status,
        }
    }

    pub fn accepts_submit(self) -> bool {
        self != Self::Sending
    }

    /// Message shown to the visitor while in this status.
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Sending => Some("Sending your message..."),
            Self::Success => Some("Message sent successfully! We'll reply soon."),
            Self::Error => Some("Sending failed. Opening email client..."),
            Self::FallbackOffered => {
                Some("Please send your message via the opened email client.")
            }
        }
    }
}
