mod nominee;
mod participant;
mod vote;

pub use participant::Registration;

use crate::config::ServerConfig;
use crate::protocol::{NomineeInfo, ServerMessage};
use crate::types::*;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc, RwLock};

/// Sender half of one connection's outbound channel. The coordinator pushes
/// targeted frames (budget updates during reconciliation) through it.
pub type ConnectionSender = mpsc::UnboundedSender<ServerMessage>;

/// Everything the session owns. Only [`AppState`] methods touch this, and
/// every mutating method holds the write lock across its whole
/// check-mutate-emit step, so requests never observe a half-applied change
/// and emission order matches mutation order.
#[derive(Default)]
struct Session {
    participants: HashMap<ParticipantId, Participant>,
    connections: HashMap<ParticipantId, ConnectionSender>,
    /// Active nominees in nomination order
    nominees: Vec<Nominee>,
    /// Per participant, the nominee names they currently back, in cast order
    /// (duplicates allowed)
    ballots: HashMap<ParticipantId, Vec<String>>,
}

impl Session {
    fn nominee_snapshot(&self) -> Vec<NomineeInfo> {
        self.nominees.iter().map(NomineeInfo::from).collect()
    }
}

/// Shared application state
pub struct AppState {
    session: RwLock<Session>,
    /// Broadcast channel fanning the nominee list out to every connection
    pub broadcast: broadcast::Sender<ServerMessage>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            session: RwLock::new(Session::default()),
            broadcast: tx,
            config,
        }
    }

    /// Fan a message out to every subscribed connection.
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // Ignore send errors (no receivers connected is fine)
        let _ = self.broadcast.send(msg);
    }

    /// Look up a participant's current record.
    pub async fn participant(&self, id: &str) -> Option<Participant> {
        self.session.read().await.participants.get(id).cloned()
    }

    pub async fn participant_count(&self) -> usize {
        self.session.read().await.participants.len()
    }

    /// Full nominee records, in nomination order.
    pub async fn nominees(&self) -> Vec<Nominee> {
        self.session.read().await.nominees.clone()
    }

    /// The public projection of the nominee list.
    pub async fn nominee_snapshot(&self) -> Vec<NomineeInfo> {
        self.session.read().await.nominee_snapshot()
    }

    /// The names a participant currently backs, in cast order.
    pub async fn ballot(&self, id: &str) -> Vec<String> {
        self.session
            .read()
            .await
            .ballots
            .get(id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
