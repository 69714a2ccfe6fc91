use super::{AppState, Session};
use crate::protocol::ServerMessage;
use crate::types::*;

impl AppState {
    /// Cast one vote for an active nominee, spending one of the voter's
    /// votes. The same voter may back the same nominee repeatedly, budget
    /// permitting.
    pub async fn cast_vote(&self, id: &str, candidate: &str) -> Result<Participant, Reject> {
        let mut session = self.session.write().await;
        let Session {
            participants,
            nominees,
            ballots,
            ..
        } = &mut *session;

        let voter = participants.get_mut(id).ok_or(Reject::UnknownParticipant)?;
        if voter.name.is_none() {
            return Err(Reject::NoDisplayName);
        }
        let nominee = nominees
            .iter_mut()
            .find(|n| n.name == candidate)
            .ok_or(Reject::UnknownNominee)?;
        if !voter.try_spend_vote() {
            return Err(Reject::OutOfVotes);
        }

        nominee.votes += 1;
        ballots
            .entry(id.to_string())
            .or_default()
            .push(candidate.to_string());
        tracing::info!("{} upvoted by {}", candidate, id);

        let updated = voter.clone();
        let snapshot = session.nominee_snapshot();
        self.broadcast_to_all(ServerMessage::Nominees { nominees: snapshot });
        Ok(updated)
    }

    /// Take back one previously cast vote on a nominee. The first occurrence
    /// in the voter's ballot goes; the rest keep their order.
    pub async fn retract_vote(&self, id: &str, candidate: &str) -> Result<Participant, Reject> {
        let mut session = self.session.write().await;
        let Session {
            participants,
            nominees,
            ballots,
            ..
        } = &mut *session;

        let voter = participants.get_mut(id).ok_or(Reject::UnknownParticipant)?;
        let nominee = nominees
            .iter_mut()
            .find(|n| n.name == candidate)
            .ok_or(Reject::UnknownNominee)?;
        if nominee.votes == 0 {
            return Err(Reject::VoteNotFound);
        }
        let ballot = ballots.get_mut(id).ok_or(Reject::VoteNotFound)?;
        let position = ballot
            .iter()
            .position(|n| n == candidate)
            .ok_or(Reject::VoteNotFound)?;

        ballot.remove(position);
        voter.refund_vote();
        nominee.votes -= 1;
        tracing::info!("{} downvoted by {}", candidate, id);

        let updated = voter.clone();
        let snapshot = session.nominee_snapshot();
        self.broadcast_to_all(ServerMessage::Nominees { nominees: snapshot });
        Ok(updated)
    }
}
