//! Stage completion rules
//!
//! A participant is done with a stage when they have a vote on every item of
//! the stage's item set. The stage is done for the trip when every
//! registered participant is done and there is at least one participant.

use crate::core::ids::{ItemId, ParticipantId};
use crate::item::entities::VotableItem;
use crate::trip::entities::Participant;
use crate::trip::stage::Stage;
use crate::voting::vote::Vote;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether `participant` has voted on every item in `items`.
///
/// An empty item set is trivially complete.
pub fn has_voted_on_all<'a>(
    items: impl IntoIterator<Item = &'a VotableItem>,
    participant: &ParticipantId,
    votes: impl IntoIterator<Item = &'a Vote>,
) -> bool {
    let voted: HashSet<&ItemId> = votes
        .into_iter()
        .filter(|v| &v.participant_id == participant)
        .map(|v| &v.item_id)
        .collect();

    items.into_iter().all(|item| voted.contains(&item.id))
}

/// Completion status of one participant for the stage being shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantStatus {
    pub id: ParticipantId,
    pub name: String,
    pub done: bool,
}

impl ParticipantStatus {
    pub fn for_stage(participant: &Participant, stage: Stage) -> Self {
        Self {
            id: participant.id.clone(),
            name: participant.name.clone(),
            done: participant.has_completed(stage),
        }
    }
}

/// Whether a stage can be closed for the whole group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageReadiness {
    /// Nobody has joined, so nothing can complete
    NoParticipants,
    /// Some participants still have items left
    Waiting { waiting_on: Vec<ParticipantId> },
    /// Everyone is done; the trip may move to `next`
    Complete { next: Stage },
}

impl StageReadiness {
    /// Evaluate `stage` against the participants' completion flags.
    ///
    /// # Example
    ///
    /// ```
    /// use tripvote_domain::{Participant, Stage, StageReadiness, TripId};
    ///
    /// let mut ana = Participant::new(TripId::new("t"), "Ana").unwrap();
    /// ana.flags.set(Stage::Destinations, true);
    ///
    /// assert_eq!(
    ///     StageReadiness::evaluate(Stage::Destinations, &[ana]),
    ///     StageReadiness::Complete { next: Stage::Accommodations }
    /// );
    /// assert_eq!(
    ///     StageReadiness::evaluate(Stage::Destinations, &[]),
    ///     StageReadiness::NoParticipants
    /// );
    /// ```
    pub fn evaluate(stage: Stage, participants: &[Participant]) -> Self {
        if participants.is_empty() {
            return StageReadiness::NoParticipants;
        }

        let waiting_on: Vec<ParticipantId> = participants
            .iter()
            .filter(|p| !p.has_completed(stage))
            .map(|p| p.id.clone())
            .collect();

        if waiting_on.is_empty() {
            StageReadiness::Complete { next: stage.next() }
        } else {
            StageReadiness::Waiting { waiting_on }
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, StageReadiness::Complete { .. })
    }
}
