//! Read-only HTTP endpoints for observing the live session.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::protocol::NomineeInfo;
use crate::state::AppState;

/// Point-in-time view of the session, for dashboards and debugging
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Number of connected participants
    pub participants: usize,
    pub nominees: Vec<NomineeInfo>,
    pub server_now: String,
}

/// Snapshot of the current session.
///
/// GET /api/session
pub async fn session_snapshot(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(SessionSnapshot {
        participants: state.participant_count().await,
        nominees: state.nominee_snapshot().await,
        server_now: chrono::Utc::now().to_rfc3339(),
    })
}
