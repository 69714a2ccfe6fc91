use super::{AppState, Session};
use crate::protocol::ServerMessage;
use crate::types::*;

impl AppState {
    /// Propose a new nominee, spending one of the proposer's nominations.
    /// Checks run before any mutation, so a refused request changes nothing
    /// and broadcasts nothing.
    pub async fn nominate(&self, id: &str, name: String) -> Result<Participant, Reject> {
        let mut session = self.session.write().await;
        let Session {
            participants,
            nominees,
            ..
        } = &mut *session;

        let participant = participants.get_mut(id).ok_or(Reject::UnknownParticipant)?;
        if participant.name.is_none() {
            return Err(Reject::NoDisplayName);
        }
        if nominees.iter().any(|n| n.name == name) {
            return Err(Reject::DuplicateNominee);
        }
        if !participant.try_spend_nomination() {
            return Err(Reject::OutOfNominations);
        }

        tracing::info!("{} nominated by {}", name, id);
        nominees.push(Nominee {
            name,
            votes: 0,
            nominated_by: id.to_string(),
        });

        let updated = participant.clone();
        let snapshot = session.nominee_snapshot();
        self.broadcast_to_all(ServerMessage::Nominees { nominees: snapshot });
        Ok(updated)
    }

    /// Withdraw a nominee its owner proposed earlier. The nomination is
    /// refunded and every outstanding vote on it returns to whoever cast it,
    /// the owner included if they backed their own nominee.
    pub async fn unnominate(&self, id: &str, name: &str) -> Result<Participant, Reject> {
        let mut session = self.session.write().await;
        let Session {
            participants,
            nominees,
            ballots,
            ..
        } = &mut *session;

        let owner = participants.get_mut(id).ok_or(Reject::UnknownParticipant)?;
        let position = nominees
            .iter()
            .position(|n| n.name == name)
            .ok_or(Reject::UnknownNominee)?;
        if nominees[position].nominated_by != owner.id {
            return Err(Reject::NotOwner);
        }

        owner.refund_nomination();
        let removed = nominees.remove(position);
        tracing::info!("{} withdrawn by {}", removed.name, id);

        // Every outstanding vote on it goes back to whoever cast it
        for (voter_id, ballot) in ballots.iter_mut() {
            let before = ballot.len();
            ballot.retain(|n| n != &removed.name);
            let returned = (before - ballot.len()) as u32;
            if returned == 0 {
                continue;
            }
            if let Some(voter) = participants.get_mut(voter_id) {
                voter.votes += returned;
            }
        }

        // Re-read the owner: the sweep above may have refunded their own votes
        let updated = participants
            .get(id)
            .cloned()
            .ok_or(Reject::UnknownParticipant)?;
        let snapshot = session.nominee_snapshot();
        self.broadcast_to_all(ServerMessage::Nominees { nominees: snapshot });
        Ok(updated)
    }
}
