mod health;
mod waitlist;

pub use health::health_check;
pub use waitlist::{join_waitlist, parse_submission, JoinResponse};

use crate::store::EntrantStore;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;

/// Largest accepted request body. Larger submissions get a JSON `Invalid request`.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Shared handler state: the storage gateway and process start time.
pub struct WaitlistState {
    pub store: Arc<dyn EntrantStore>,
    pub start_time: Instant,
}

impl WaitlistState {
    pub fn new(store: Arc<dyn EntrantStore>) -> Self {
        Self {
            store,
            start_time: Instant::now(),
        }
    }
}

pub fn router(state: Arc<WaitlistState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/waitlist", post(join_waitlist))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
