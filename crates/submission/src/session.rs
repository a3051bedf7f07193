use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::{
    DeliveryChannel, Effect, FallbackOpener, FieldEdit, Flow, FormKind, FormState, MailtoLink,
    Msg, Result, SubmissionStatus,
};

#[derive(Clone, Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub kind: FormKind,
    pub status: SubmissionStatus,
    pub message: Option<&'static str>,
    pub notice: Option<String>,
    pub fallback_link: Option<MailtoLink>,
    pub form: FormState,
}

/// One mounted form. Clones share the same state.
///
/// The flow lock is never held while the delivery channel is awaited, so
/// readers can observe `Sending` and a concurrent submit is refused with
/// [`crate::Error::InFlight`] instead of queueing.
#[derive(Clone)]
pub struct FormSession {
    id: String,
    flow: Arc<Mutex<Flow>>,
    channel: Arc<dyn DeliveryChannel>,
    opener: Arc<dyn FallbackOpener>,
}

impl FormSession {
    pub fn new(
        id: impl Into<String>,
        flow: Flow,
        channel: Arc<dyn DeliveryChannel>,
        opener: Arc<dyn FallbackOpener>,
    ) -> Self {
        Self {
            id: id.into(),
            flow: Arc::new(Mutex::new(flow)),
            channel,
            opener,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn view(&self) -> SessionView {
        let flow = self.flow.lock().await;

        SessionView {
            id: self.id.to_owned(),
            kind: flow.kind(),
            status: flow.status(),
            message: flow.status().message(),
            notice: flow.notice().map(str::to_owned),
            fallback_link: flow.fallback().cloned(),
            form: flow.form().clone(),
        }
    }

    pub async fn kind(&self) -> FormKind {
        self.flow.lock().await.kind()
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.flow.lock().await.status()
    }

    pub async fn edit(&self, edit: FieldEdit) -> Result<()> {
        self.flow.lock().await.update(Msg::Edit(edit))?;

        Ok(())
    }

    /// Loads `form` and submits it. Resolves once the delivery channel has
    /// answered, with `Success` or `Error`.
    pub async fn submit(&self, form: FormState) -> Result<SubmissionStatus> {
        let effects = {
            let mut flow = self.flow.lock().await;
            flow.load(form)?;
            flow.update(Msg::Submit {
                at: OffsetDateTime::now_utc(),
            })?
        };

        self.run(effects).await;

        Ok(self.status().await)
    }

    /// Submits whatever the form currently holds.
    pub async fn submit_current(&self) -> Result<SubmissionStatus> {
        let effects = self
            .flow
            .lock()
            .await
            .update(Msg::Submit {
                at: OffsetDateTime::now_utc(),
            })?;

        self.run(effects).await;

        Ok(self.status().await)
    }

    async fn dispatch(&self, msg: Msg) -> Vec<Effect> {
        match self.flow.lock().await.update(msg) {
            Ok(effects) => effects,
            Err(err) => {
                tracing::error!(session = %self.id, error = %err, "Failed to apply flow message");
                vec![]
            }
        }
    }

    async fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            let Effect::Deliver { attempt, message } = effect else {
                self.spawn_effects(vec![effect]);
                continue;
            };

            tracing::info!(
                session = %self.id,
                attempt,
                kind = %message.kind(),
                "Delivering message"
            );

            let outcome = match self.channel.send(&message).await {
                Ok(()) => Msg::Delivered { attempt },
                Err(err) => Msg::Failed {
                    attempt,
                    reason: err.to_string(),
                },
            };

            let follow_ups = self.dispatch(outcome).await;
            self.spawn_effects(follow_ups);
        }
    }

    fn spawn_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Schedule {
                    attempt,
                    after,
                    timer,
                } => {
                    let session = self.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let follow_ups = session.dispatch(timer.elapsed(attempt)).await;
                        session.spawn_effects(follow_ups);
                    });
                }
                Effect::OpenFallback { attempt, link } => {
                    tracing::info!(session = %self.id, attempt, "Opening fallback link");
                    self.opener.open(&link);
                }
                Effect::Deliver { attempt, .. } => {
                    tracing::error!(
                        session = %self.id,
                        attempt,
                        "Delivery can only start from a submit"
                    );
                }
            }
        }
    }
}
