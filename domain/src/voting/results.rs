//! Final ranking of a stage's items

use crate::core::ids::{ItemId, ParticipantId};
use crate::item::entities::VotableItem;
use crate::trip::entities::Participant;
use crate::trip::stage::Stage;
use crate::voting::tally::VoteCounts;
use crate::voting::vote::Vote;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Like share at or above which the leading item counts as the group's pick
pub const TOP_CHOICE_THRESHOLD: f64 = 50.0;

/// How one item fared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    pub item_id: ItemId,
    pub title: String,
    pub likes: usize,
    pub total_votes: usize,
    /// Likes as a percentage of votes on this item (0 when unvoted)
    pub percentage: f64,
    /// Names of the participants who liked it
    pub liked_by: Vec<String>,
}

/// Ranked results for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResults {
    pub stage: Stage,
    /// Sorted by percentage, then likes, both descending
    pub ranking: Vec<ItemResult>,
}

impl StageResults {
    pub fn rank(
        stage: Stage,
        items: &[VotableItem],
        votes: &[Vote],
        participants: &[Participant],
    ) -> Self {
        let stage_items: Vec<&VotableItem> =
            items.iter().filter(|item| item.stage() == stage).collect();
        let stage_votes: Vec<&Vote> = votes.iter().filter(|v| v.stage == stage).collect();
        let counts = VoteCounts::tally(stage_items.iter().copied(), stage_votes.iter().copied());
        let names: HashMap<&ParticipantId, &str> = participants
            .iter()
            .map(|p| (&p.id, p.name.as_str()))
            .collect();

        let mut ranking: Vec<ItemResult> = stage_items
            .iter()
            .map(|item| {
                let tally = counts.get(&item.id);
                let liked_by = stage_votes
                    .iter()
                    .filter(|v| v.item_id == item.id && v.value.is_like())
                    .filter_map(|v| names.get(&v.participant_id).map(|n| n.to_string()))
                    .collect();
                ItemResult {
                    item_id: item.id.clone(),
                    title: item.title(),
                    likes: tally.likes,
                    total_votes: tally.total(),
                    percentage: tally.like_ratio() * 100.0,
                    liked_by,
                }
            })
            .collect();

        ranking.sort_by(|a, b| {
            b.percentage
                .total_cmp(&a.percentage)
                .then_with(|| b.likes.cmp(&a.likes))
        });

        Self { stage, ranking }
    }

    /// The leader, when at least half of its votes are likes.
    pub fn top_choice(&self) -> Option<&ItemResult> {
        self.ranking
            .first()
            .filter(|r| r.likes > 0 && r.percentage >= TOP_CHOICE_THRESHOLD)
    }

    /// Items that got at least one like, in ranking order.
    pub fn matches(&self) -> impl Iterator<Item = &ItemResult> {
        self.ranking.iter().filter(|r| r.likes > 0)
    }
}
