//! Per-item vote tallies
//!
//! Tallies are always computed from the full current vote set, never
//! applied incrementally, so recomputing after duplicate notifications
//! yields the same result.

use crate::core::ids::ItemId;
use crate::item::entities::VotableItem;
use crate::voting::vote::Vote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Like/pass counts for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub likes: usize,
    pub passes: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.likes + self.passes
    }

    /// Share of likes (0.0 to 1.0)
    pub fn like_ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.likes as f64 / self.total() as f64
        }
    }

    /// Visual summary, e.g. "[●●○]"
    pub fn summary(&self) -> String {
        let mut summary = String::from("[");
        summary.extend(std::iter::repeat_n('●', self.likes));
        summary.extend(std::iter::repeat_n('○', self.passes));
        summary.push(']');
        summary
    }
}

/// Tallies for every item of a stage
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteCounts {
    counts: BTreeMap<ItemId, Tally>,
}

impl VoteCounts {
    /// Count `votes` against `items`.
    ///
    /// Every item gets an entry, zero when nobody voted on it. Votes on items
    /// outside `items` are ignored. Each vote row counts once; uniqueness of
    /// (item, participant) is the store's job.
    pub fn tally<'a>(
        items: impl IntoIterator<Item = &'a VotableItem>,
        votes: impl IntoIterator<Item = &'a Vote>,
    ) -> Self {
        let mut counts: BTreeMap<ItemId, Tally> = items
            .into_iter()
            .map(|item| (item.id.clone(), Tally::default()))
            .collect();

        for vote in votes {
            if let Some(tally) = counts.get_mut(&vote.item_id) {
                if vote.value.is_like() {
                    tally.likes += 1;
                } else {
                    tally.passes += 1;
                }
            }
        }

        Self { counts }
    }

    pub fn get(&self, item: &ItemId) -> Tally {
        self.counts.get(item).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Tally)> {
        self.counts.iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all votes across items.
    pub fn total_votes(&self) -> usize {
        self.counts.values().map(Tally::total).sum()
    }
}
