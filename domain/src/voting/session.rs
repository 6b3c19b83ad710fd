//! Per-participant voting state machine
//!
//! A [`VotingSession`] walks one participant through the active stage's item
//! list. It owns no I/O: the application layer persists the vote between
//! [`VotingSession::begin_vote`] and [`VotingSession::confirm_vote`] (or
//! [`VotingSession::abort_vote`] when the write fails).
//!
//! ```text
//!            begin_vote            write ok             (index == len)
//!   Ready ──────────────▶ InFlight ─────────▶ Cooling ─────────────────▶ StageFinished
//!     ▲                      │                   │
//!     │       write failed   │                   │ cooldown elapsed
//!     └──────────────────────┘◀──────────────────┘
//! ```
//!
//! The shared trip stage is not owned here; when it advances the session is
//! moved with [`VotingSession::enter_stage`].

use crate::core::error::DomainError;
use crate::core::ids::{ItemId, ParticipantId};
use crate::item::entities::VotableItem;
use crate::trip::stage::Stage;
use crate::voting::vote::{Vote, VoteValue};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default pause after each submission before the next vote is accepted.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(300);

/// A vote that has passed local validation and awaits persistence.
///
/// Hand it back to `confirm_vote` once the write succeeded or to
/// `abort_vote` if it failed.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingVote {
    pub stage: Stage,
    pub item_id: ItemId,
    pub value: VoteValue,
}

/// What happened after a vote was confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteProgress {
    /// More items remain; `index` points at the next unvoted one
    Advanced { index: usize },
    /// Every item of the stage now has a vote from this participant
    StageFinished,
}

/// Voting state of one participant in one trip
#[derive(Debug, Clone)]
pub struct VotingSession {
    participant_id: ParticipantId,
    stage: Stage,
    items: Vec<ItemId>,
    current_index: usize,
    votes_cast: HashMap<ItemId, VoteValue>,
    in_flight: Option<ItemId>,
    cooldown: Duration,
    ready_at: Option<Instant>,
}

impl VotingSession {
    /// Build the session for `stage`, seeded with the participant's existing
    /// votes, and seek to the first item without a vote.
    ///
    /// Resuming twice from the same data gives the same state.
    pub fn resume<'a>(
        participant_id: ParticipantId,
        stage: Stage,
        items: &[VotableItem],
        existing_votes: impl IntoIterator<Item = &'a Vote>,
    ) -> Self {
        let mut session = Self {
            participant_id,
            stage,
            items: Vec::new(),
            current_index: 0,
            votes_cast: HashMap::new(),
            in_flight: None,
            cooldown: DEFAULT_COOLDOWN,
            ready_at: None,
        };
        session.load(stage, items, existing_votes);
        session
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    fn load<'a>(
        &mut self,
        stage: Stage,
        items: &[VotableItem],
        existing_votes: impl IntoIterator<Item = &'a Vote>,
    ) {
        let mut ordered: Vec<&VotableItem> =
            items.iter().filter(|item| item.stage() == stage).collect();
        ordered.sort_by_key(|item| item.position);

        self.stage = stage;
        self.items = ordered.into_iter().map(|item| item.id.clone()).collect();
        self.votes_cast = existing_votes
            .into_iter()
            .filter(|v| v.participant_id == self.participant_id && v.stage == stage)
            .filter(|v| self.items.contains(&v.item_id))
            .map(|v| (v.item_id.clone(), v.value))
            .collect();
        self.in_flight = None;
        self.ready_at = None;
        self.current_index = 0;
        self.current_index = self.first_unvoted_index();
    }

    /// Linear scan for the first item lacking a vote; `len` when all are voted.
    pub fn first_unvoted_index(&self) -> usize {
        self.items
            .iter()
            .position(|id| !self.votes_cast.contains_key(id))
            .unwrap_or(self.items.len())
    }

    /// Validate a vote and mark it in flight.
    ///
    /// Local state does not change until the vote is confirmed.
    pub fn begin_vote(
        &mut self,
        item_id: &ItemId,
        value: VoteValue,
        now: Instant,
    ) -> Result<PendingVote, DomainError> {
        if self.is_finished() {
            return Err(DomainError::VotingClosed);
        }
        if self.in_flight.is_some() || self.ready_at.is_some_and(|at| now < at) {
            return Err(DomainError::SubmissionInFlight);
        }
        if !self.items.contains(item_id) {
            return Err(DomainError::ItemNotInStage {
                item: item_id.clone(),
                stage: self.stage,
            });
        }
        if self.current_index >= self.items.len() {
            return Err(DomainError::StageExhausted(self.stage));
        }

        self.in_flight = Some(item_id.clone());
        Ok(PendingVote {
            stage: self.stage,
            item_id: item_id.clone(),
            value,
        })
    }

    /// Record a persisted vote and move to the next unvoted item.
    pub fn confirm_vote(&mut self, pending: PendingVote, now: Instant) -> VoteProgress {
        self.in_flight = None;
        self.ready_at = Some(now + self.cooldown);

        // The stage moved on while the write was in flight; the vote belongs to
        // an item set this session no longer shows.
        if pending.stage != self.stage {
            return self.progress();
        }

        self.votes_cast.insert(pending.item_id, pending.value);
        self.current_index = self.first_unvoted_index();
        self.progress()
    }

    /// Release a vote whose write failed. Nothing else changes.
    pub fn abort_vote(&mut self, pending: PendingVote) {
        if self.in_flight.as_ref() == Some(&pending.item_id) {
            self.in_flight = None;
        }
    }

    fn progress(&self) -> VoteProgress {
        if self.current_index >= self.items.len() {
            VoteProgress::StageFinished
        } else {
            VoteProgress::Advanced {
                index: self.current_index,
            }
        }
    }

    /// Move to a later stage once the group has advanced.
    ///
    /// Re-entering the same stage reloads its items and votes. Going back is
    /// an error.
    pub fn enter_stage<'a>(
        &mut self,
        stage: Stage,
        items: &[VotableItem],
        existing_votes: impl IntoIterator<Item = &'a Vote>,
    ) -> Result<(), DomainError> {
        if stage < self.stage {
            return Err(DomainError::StageRegression {
                from: self.stage,
                to: stage,
            });
        }
        self.load(stage, items, existing_votes);
        Ok(())
    }

    /// Go back to an item of the current stage to change the vote on it.
    ///
    /// This only moves the pointer; the stage itself never rolls back.
    pub fn rewind_to(&mut self, item_id: &ItemId) -> Result<usize, DomainError> {
        if self.is_finished() {
            return Err(DomainError::VotingClosed);
        }
        if self.in_flight.is_some() {
            return Err(DomainError::SubmissionInFlight);
        }
        let index = self
            .items
            .iter()
            .position(|id| id == item_id)
            .ok_or_else(|| DomainError::ItemNotInStage {
                item: item_id.clone(),
                stage: self.stage,
            })?;
        self.current_index = index;
        Ok(index)
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_item(&self) -> Option<&ItemId> {
        self.items.get(self.current_index)
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn votes_cast(&self) -> &HashMap<ItemId, VoteValue> {
        &self.votes_cast
    }

    pub fn vote_for(&self, item_id: &ItemId) -> Option<VoteValue> {
        self.votes_cast.get(item_id).copied()
    }

    /// Number of items still lacking a vote.
    pub fn remaining(&self) -> usize {
        self.items
            .iter()
            .filter(|id| !self.votes_cast.contains_key(*id))
            .count()
    }

    /// All items of the current stage have a vote from this participant.
    pub fn is_stage_done(&self) -> bool {
        self.remaining() == 0
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a new vote would be accepted at `now` (ignoring item checks).
    pub fn is_ready(&self, now: Instant) -> bool {
        !self.is_finished()
            && self.in_flight.is_none()
            && self.ready_at.is_none_or(|at| now >= at)
    }

    /// The trip reached [`Stage::Completed`]; no further votes are accepted.
    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Completed
    }
}
