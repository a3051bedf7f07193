use axum::{
    Router,
    routing::{get, post},
};

use crate::forms::FormRegistry;

mod health;
mod membership;
mod sessions;

pub use sessions::{MountInput, SubmitInput};

#[derive(Clone)]
pub struct AppState {
    pub forms: FormRegistry,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/membership/options", get(membership::options))
        .route("/sessions", post(sessions::mount))
        .route(
            "/sessions/{id}",
            get(sessions::show).delete(sessions::unmount),
        )
        .route("/sessions/{id}/submit", post(sessions::submit))
        .with_state(app_state)
}
