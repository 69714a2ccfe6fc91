use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Claim (or change) the display name for an assigned participant id
    Greet {
        id: ParticipantId,
        username: String,
    },
    Nominate {
        nominater: ParticipantId,
        nominee: String,
        /// When true, withdraw the nominee instead of proposing it
        unnominate: bool,
    },
    Vote {
        voter: ParticipantId,
        candidate: String,
        /// When true cast a vote, otherwise take one back
        upvote: bool,
    },
    Heartbeat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Sent once per connection: the assigned id plus the current nominees
    Greet {
        id: ParticipantId,
        nominees: Vec<NomineeInfo>,
        server_now: String,
    },
    /// Full nominee list, broadcast after every visible change
    Nominees {
        nominees: Vec<NomineeInfo>,
    },
    /// One participant's own record, sent only to them
    Update {
        user: Participant,
    },
    Heartbeat {
        server_now: String,
    },
}

/// Public nominee info (the owning participant id stays server-side)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NomineeInfo {
    pub name: String,
    pub votes: u32,
}

impl From<&Nominee> for NomineeInfo {
    fn from(n: &Nominee) -> Self {
        Self {
            name: n.name.clone(),
            votes: n.votes,
        }
    }
}
