use super::{AppState, ConnectionSender, Session};
use crate::protocol::{NomineeInfo, ServerMessage};
use crate::types::*;
use tokio::sync::broadcast;

/// Everything a fresh connection needs to start talking: the new participant
/// record, the nominee list as of registration, and a broadcast receiver
/// subscribed at the same instant.
pub struct Registration {
    pub participant: Participant,
    pub nominees: Vec<NomineeInfo>,
    pub updates: broadcast::Receiver<ServerMessage>,
}

impl AppState {
    /// Create a participant with full budgets and wire up its connection.
    pub async fn register_participant(&self, sender: ConnectionSender) -> Registration {
        let mut session = self.session.write().await;

        // Generate a unique id (check for collisions)
        let id = loop {
            let candidate = ulid::Ulid::new().to_string();
            if !session.participants.contains_key(&candidate) {
                break candidate;
            }
            // Collision - try again (practically unreachable with ULIDs)
        };

        let participant = Participant {
            id: id.clone(),
            name: None,
            nominations: self.config.starting_nominations,
            votes: self.config.starting_votes,
        };
        session.participants.insert(id.clone(), participant.clone());
        session.connections.insert(id, sender);

        // Subscribing while the write lock is held: no broadcast can land
        // between this snapshot and the receiver.
        Registration {
            nominees: session.nominee_snapshot(),
            updates: self.broadcast.subscribe(),
            participant,
        }
    }

    /// Set (or change) a participant's display name
    pub async fn set_display_name(&self, id: &str, name: String) -> Result<Participant, Reject> {
        let mut session = self.session.write().await;

        if let Some(participant) = session.participants.get_mut(id) {
            participant.name = Some(name);
            Ok(participant.clone())
        } else {
            Err(Reject::UnknownParticipant)
        }
    }

    /// Remove a departing participant and reconcile everything they leave
    /// behind. Their cast votes come off the tallies; nominees they proposed
    /// dissolve, with the spent votes returned to each remaining supporter,
    /// who is told directly. One NOMINEES broadcast goes out at the end.
    pub async fn release_participant(&self, id: &str) -> Option<Participant> {
        let mut session = self.session.write().await;

        // 1. Drop the connection sender and the participant record
        session.connections.remove(id);
        let departed = session.participants.remove(id)?;

        let Session {
            participants,
            connections,
            nominees,
            ballots,
        } = &mut *session;

        // 2. Their cast votes come off the tallies (no refund, they're gone)
        if let Some(ballot) = ballots.remove(id) {
            for name in &ballot {
                if let Some(nominee) = nominees.iter_mut().find(|n| &n.name == name) {
                    nominee.votes -= 1;
                }
            }
        }

        // 3. Dissolve their nominees; each remaining supporter gets the spent
        //    votes back and hears about it on their own channel
        let (owned, remaining): (Vec<Nominee>, Vec<Nominee>) =
            nominees.drain(..).partition(|n| n.nominated_by == id);
        *nominees = remaining;

        for nominee in &owned {
            for (voter_id, ballot) in ballots.iter_mut() {
                let before = ballot.len();
                ballot.retain(|name| name != &nominee.name);
                let returned = (before - ballot.len()) as u32;
                if returned == 0 {
                    continue;
                }
                if let Some(voter) = participants.get_mut(voter_id) {
                    voter.votes += returned;
                    if let Some(tx) = connections.get(voter_id) {
                        let _ = tx.send(ServerMessage::Update {
                            user: voter.clone(),
                        });
                    }
                }
            }
        }

        // 4. Exactly one broadcast, after the whole cleanup
        let snapshot = session.nominee_snapshot();
        self.broadcast_to_all(ServerMessage::Nominees { nominees: snapshot });

        tracing::info!("Released participant {}", id);
        Some(departed)
    }
}
