pub mod config;
pub mod error;
pub mod forms;
pub mod observability;
pub mod routes;

pub use config::Config;
pub use forms::FormRegistry;
pub use routes::{AppState, router};
