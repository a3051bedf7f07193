//! Reducer for one mounted form.
//!
//! ```text
//! Flow × Msg → (Flow, Vec<Effect>)
//! ```
//!
//! The reducer never performs I/O. [`crate::FormSession`] executes the
//! returned effects and feeds their outcome back as messages. Every outcome
//! and timer message carries the attempt that produced it; messages from a
//! superseded attempt are dropped, so a slow fallback timer can never fire
//! over a newer attempt or a late success.

use std::time::Duration;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error, Event, FieldEdit, FormKind, FormState, MailtoLink, Mailbox, OutboundMessage, Result,
    SubmissionStatus,
};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// How long the success message stays before the form returns to idle.
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
    /// Delay between a failed delivery and the fallback link.
    #[serde(default = "default_fallback_delay_ms")]
    pub fallback_delay_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            success_display_ms: default_success_display_ms(),
            fallback_delay_ms: default_fallback_delay_ms(),
        }
    }
}

impl Timing {
    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

fn default_success_display_ms() -> u64 {
    3000
}

fn default_fallback_delay_ms() -> u64 {
    2000
}

#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    Edit(FieldEdit),
    Submit { at: OffsetDateTime },
    Delivered { attempt: u64 },
    Failed { attempt: u64, reason: String },
    DisplayElapsed { attempt: u64 },
    FallbackElapsed { attempt: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    DisplayElapsed,
    FallbackElapsed,
}

impl Timer {
    pub fn elapsed(self, attempt: u64) -> Msg {
        match self {
            Self::DisplayElapsed => Msg::DisplayElapsed { attempt },
            Self::FallbackElapsed => Msg::FallbackElapsed { attempt },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Deliver {
        attempt: u64,
        message: OutboundMessage,
    },
    Schedule {
        attempt: u64,
        after: Duration,
        timer: Timer,
    },
    OpenFallback {
        attempt: u64,
        link: MailtoLink,
    },
}

#[derive(Clone, Debug)]
pub struct Flow {
    form: FormState,
    status: SubmissionStatus,
    notice: Option<String>,
    attempt: u64,
    in_flight: Option<OutboundMessage>,
    fallback: Option<MailtoLink>,
    mailbox: Mailbox,
    timing: Timing,
}

impl Flow {
    pub fn new(kind: FormKind, mailbox: Mailbox, timing: Timing) -> Self {
        Self {
            form: FormState::new(kind),
            status: SubmissionStatus::Idle,
            notice: None,
            attempt: 0,
            in_flight: None,
            fallback: None,
            mailbox,
            timing,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.form.kind()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Inline validation message of the last rejected submit.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn fallback(&self) -> Option<&MailtoLink> {
        self.fallback.as_ref()
    }

    /// Replaces every field at once, as a full form post does.
    pub fn load(&mut self, form: FormState) -> Result<()> {
        if !self.status.accepts_submit() {
            return Err(Error::InFlight);
        }

        if form.kind() != self.kind() {
            return Err(Error::WrongKind {
                expected: self.kind(),
                actual: form.kind(),
            });
        }

        self.form = form;

        Ok(())
    }

    pub fn update(&mut self, msg: Msg) -> Result<Vec<Effect>> {
        match msg {
            Msg::Edit(edit) => {
                self.form.apply(edit)?;
                Ok(vec![])
            }
            Msg::Submit { at } => self.submit(at),
            Msg::Delivered { attempt } => Ok(self.delivered(attempt)),
            Msg::Failed { attempt, reason } => Ok(self.failed(attempt, reason)),
            Msg::DisplayElapsed { attempt } => {
                if attempt == self.attempt {
                    self.status = self.status.on(Event::DisplayElapsed);
                }
                Ok(vec![])
            }
            Msg::FallbackElapsed { attempt } => Ok(self.fallback_elapsed(attempt)),
        }
    }

    fn submit(&mut self, at: OffsetDateTime) -> Result<Vec<Effect>> {
        if !self.status.accepts_submit() {
            return Err(Error::InFlight);
        }

        if let Err(err) = self.form.validate() {
            self.notice = Some(err.message.to_owned());
            return Err(err.into());
        }

        let message = OutboundMessage::compose(&self.form, &self.mailbox, at)?;

        self.attempt += 1;
        self.notice = None;
        self.fallback = None;
        self.in_flight = Some(message.clone());
        self.status = self.status.on(Event::Submit);

        tracing::debug!(
            kind = %self.kind(),
            attempt = self.attempt,
            "Submission started"
        );

        Ok(vec![Effect::Deliver {
            attempt: self.attempt,
            message,
        }])
    }

    fn delivered(&mut self, attempt: u64) -> Vec<Effect> {
        if attempt != self.attempt || self.status != SubmissionStatus::Sending {
            return vec![];
        }

        self.status = self.status.on(Event::Ack);
        self.in_flight = None;
        self.form.reset();

        vec![Effect::Schedule {
            attempt,
            after: self.timing.success_display(),
            timer: Timer::DisplayElapsed,
        }]
    }

    fn failed(&mut self, attempt: u64, reason: String) -> Vec<Effect> {
        if attempt != self.attempt || self.status != SubmissionStatus::Sending {
            return vec![];
        }

        tracing::warn!(
            kind = %self.kind(),
            attempt,
            reason = %reason,
            "Delivery failed, fallback scheduled"
        );

        self.status = self.status.on(Event::Reject);

        vec![Effect::Schedule {
            attempt,
            after: self.timing.fallback_delay(),
            timer: Timer::FallbackElapsed,
        }]
    }

    fn fallback_elapsed(&mut self, attempt: u64) -> Vec<Effect> {
        if attempt != self.attempt || self.status != SubmissionStatus::Error {
            return vec![];
        }

        let Some(message) = self.in_flight.take() else {
            return vec![];
        };

        let link = message.fallback_link();
        self.fallback = Some(link.clone());
        self.status = self.status.on(Event::FallbackElapsed);

        vec![Effect::OpenFallback { attempt, link }]
    }
}
