//! WebSocket message dispatch
//!
//! The main entry point for handling client messages. Requests are applied to
//! the session atomically; the return value is the frame for the sending
//! connection only (broadcasts and reconciliation frames travel on their own
//! channels).

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{Participant, Reject};
use std::sync::Arc;

/// Handle a client message and return the optional reply for its connection
pub async fn handle_message(msg: ClientMessage, state: &Arc<AppState>) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Greet { id, username } => {
            tracing::info!("Greet: id={}, username={}", id, username);
            match state.set_display_name(&id, username).await {
                Ok(user) => Some(ServerMessage::Update { user }),
                Err(reject) => {
                    tracing::debug!("Greet refused for {}: {}", id, reject);
                    None
                }
            }
        }

        ClientMessage::Nominate {
            nominater,
            nominee,
            unnominate,
        } => {
            let outcome = if unnominate {
                state.unnominate(&nominater, &nominee).await
            } else {
                state.nominate(&nominater, nominee).await
            };
            update_reply(state, &nominater, outcome).await
        }

        ClientMessage::Vote {
            voter,
            candidate,
            upvote,
        } => {
            let outcome = if upvote {
                state.cast_vote(&voter, &candidate).await
            } else {
                state.retract_vote(&voter, &candidate).await
            };
            update_reply(state, &voter, outcome).await
        }

        ClientMessage::Heartbeat => Some(ServerMessage::Heartbeat {
            server_now: chrono::Utc::now().to_rfc3339(),
        }),
    }
}

/// Known requesters always hear back with their current record, even when the
/// request was refused; unknown ids get nothing.
async fn update_reply(
    state: &Arc<AppState>,
    id: &str,
    outcome: Result<Participant, Reject>,
) -> Option<ServerMessage> {
    match outcome {
        Ok(user) => Some(ServerMessage::Update { user }),
        Err(Reject::UnknownParticipant) => {
            tracing::debug!("Request from unknown participant {}", id);
            None
        }
        Err(reject) => {
            tracing::debug!("Request refused for {}: {}", id, reject);
            let user = state.participant(id).await?;
            Some(ServerMessage::Update { user })
        }
    }
}
