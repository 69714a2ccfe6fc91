use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque ID type for type safety
pub type ParticipantId = String;

/// Nomination allowance handed to every participant on connect
pub const STARTING_NOMINATIONS: u32 = 3;
/// Vote allowance handed to every participant on connect
pub const STARTING_VOTES: u32 = 10;

/// A connected client session with its remaining action budgets.
///
/// Created with full budgets when the connection registers, destroyed when it
/// closes. Serializes as the `user` payload of UPDATE frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    /// Set via GREET; nominating and voting are refused until it exists
    pub name: Option<String>,
    pub nominations: u32,
    pub votes: u32,
}

impl Participant {
    /// Consume one nomination if any are left.
    pub fn try_spend_nomination(&mut self) -> bool {
        if self.nominations > 0 {
            self.nominations -= 1;
            true
        } else {
            false
        }
    }

    /// Consume one vote if any are left.
    pub fn try_spend_vote(&mut self) -> bool {
        if self.votes > 0 {
            self.votes -= 1;
            true
        } else {
            false
        }
    }

    /// Hand back a previously spent nomination. Callers pair this 1:1 with a
    /// successful spend; the starting maximum is not re-checked here.
    pub fn refund_nomination(&mut self) {
        self.nominations += 1;
    }

    /// Hand back a previously spent vote.
    pub fn refund_vote(&mut self) {
        self.votes += 1;
    }
}

/// A proposed option up for votes, uniquely named while active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Nominee {
    pub name: String,
    pub votes: u32,
    /// Whose nomination budget backs this nominee. Ownership lives on the
    /// record itself, never re-derived from other tables.
    pub nominated_by: ParticipantId,
}

/// Reasons a request is refused. Refusals never mutate state and are silent
/// on the wire (the requester at most sees an unchanged UPDATE).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Reject {
    #[error("unknown participant")]
    UnknownParticipant,
    #[error("participant has not set a display name")]
    NoDisplayName,
    #[error("no nominations left")]
    OutOfNominations,
    #[error("no votes left")]
    OutOfVotes,
    #[error("a nominee with that name already exists")]
    DuplicateNominee,
    #[error("no such nominee")]
    UnknownNominee,
    #[error("nominee belongs to another participant")]
    NotOwner,
    #[error("no vote on that nominee to take back")]
    VoteNotFound,
}
