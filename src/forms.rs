//! Mounted form sessions, keyed by ULID.
//!
//! Sessions untouched for longer than the TTL are evicted whenever a new
//! form is mounted. A session in `Sending` is never evicted.

use std::{collections::HashMap, sync::Arc, time::Duration};

use greenkenya_submission::{
    ClientHandoff, DeliveryChannel, FallbackOpener, Flow, FormKind, FormSession, Mailbox,
    SubmissionStatus, Timing,
};
use tokio::{sync::RwLock, time::Instant};
use ulid::Ulid;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

struct Mounted {
    session: FormSession,
    touched: Instant,
}

#[derive(Clone)]
pub struct FormRegistry {
    sessions: Arc<RwLock<HashMap<String, Mounted>>>,
    channel: Arc<dyn DeliveryChannel>,
    opener: Arc<dyn FallbackOpener>,
    mailbox: Mailbox,
    timing: Timing,
    session_ttl: Duration,
}

impl FormRegistry {
    pub fn new(channel: Arc<dyn DeliveryChannel>, mailbox: Mailbox, timing: Timing) -> Self {
        Self {
            sessions: Arc::default(),
            channel,
            opener: Arc::new(ClientHandoff),
            mailbox,
            timing,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    pub async fn mount(&self, kind: FormKind) -> FormSession {
        self.evict_idle().await;

        let id = Ulid::new().to_string();
        let session = FormSession::new(
            id.to_owned(),
            Flow::new(kind, self.mailbox.clone(), self.timing),
            self.channel.clone(),
            self.opener.clone(),
        );

        self.sessions.write().await.insert(
            id,
            Mounted {
                session: session.clone(),
                touched: Instant::now(),
            },
        );
        tracing::info!(session = %session.id(), kind = %kind, "Form mounted");

        session
    }

    /// Looks up a session and marks it as recently used.
    pub async fn get(&self, id: &str) -> Option<FormSession> {
        let mut sessions = self.sessions.write().await;
        let mounted = sessions.get_mut(id)?;
        mounted.touched = Instant::now();

        Some(mounted.session.clone())
    }

    async fn evict_idle(&self) {
        let mut sessions = self.sessions.write().await;

        let mut expired = Vec::new();
        for (id, mounted) in sessions.iter() {
            if mounted.touched.elapsed() < self.session_ttl {
                continue;
            }
            if mounted.session.status().await == SubmissionStatus::Sending {
                continue;
            }
            expired.push(id.to_owned());
        }

        for id in expired {
            sessions.remove(&id);
            tracing::info!(session = %id, "Idle form evicted");
        }
    }

    /// Pending timers of the removed session still run to completion.
    pub async fn unmount(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session = %id, "Form unmounted");
        }

        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
