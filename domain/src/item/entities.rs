//! Votable item entities
//!
//! Destinations, accommodations and transportation legs share one entity,
//! [`VotableItem`], whose [`ItemDetails`] is discriminated by stage. Prices
//! of every kind go through the same [`TierPrices`] projection.

use crate::core::ids::{ItemId, TripId};
use crate::trip::budget::BudgetTier;
use crate::trip::stage::Stage;
use serde::{Deserialize, Serialize};

/// A price (USD) for each budget tier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierPrices {
    pub budget: Option<f64>,
    pub mid_range: Option<f64>,
    pub luxury: Option<f64>,
}

impl TierPrices {
    pub fn new(budget: f64, mid_range: f64, luxury: f64) -> Self {
        Self {
            budget: Some(budget),
            mid_range: Some(mid_range),
            luxury: Some(luxury),
        }
    }

    /// Price for the given tier, if known.
    pub fn price_for(&self, tier: BudgetTier) -> Option<f64> {
        match tier {
            BudgetTier::Budget => self.budget,
            BudgetTier::MidRange => self.mid_range,
            BudgetTier::Luxury => self.luxury,
        }
    }
}

/// Kind-specific attributes of a votable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDetails {
    Destination {
        name: String,
        country: String,
        description: Option<String>,
        image_url: Option<String>,
        best_time_to_visit: Option<String>,
        #[serde(default)]
        highlights: Vec<String>,
        /// Estimated cost per person for the whole stay
        costs: TierPrices,
    },
    Accommodation {
        name: String,
        /// hotel, resort, hostel, apartment...
        category: String,
        location: String,
        description: Option<String>,
        image_url: Option<String>,
        #[serde(default)]
        amenities: Vec<String>,
        rating: Option<f32>,
        /// Price per night
        nightly: TierPrices,
    },
    Transportation {
        /// flight, train, bus, car...
        mode: String,
        provider: String,
        departure_location: String,
        arrival_location: String,
        departure_time: Option<String>,
        arrival_time: Option<String>,
        duration_minutes: Option<u32>,
        description: Option<String>,
        fares: TierPrices,
    },
}

impl ItemDetails {
    /// The stage whose item set this kind belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            ItemDetails::Destination { .. } => Stage::Destinations,
            ItemDetails::Accommodation { .. } => Stage::Accommodations,
            ItemDetails::Transportation { .. } => Stage::Transportation,
        }
    }

    pub fn prices(&self) -> &TierPrices {
        match self {
            ItemDetails::Destination { costs, .. } => costs,
            ItemDetails::Accommodation { nightly, .. } => nightly,
            ItemDetails::Transportation { fares, .. } => fares,
        }
    }

    /// Short human-readable title.
    pub fn title(&self) -> String {
        match self {
            ItemDetails::Destination { name, country, .. } => {
                if name.eq_ignore_ascii_case(country) {
                    name.clone()
                } else {
                    format!("{}, {}", name, country)
                }
            }
            ItemDetails::Accommodation { name, location, .. } => {
                format!("{} ({})", name, location)
            }
            ItemDetails::Transportation {
                mode,
                provider,
                departure_location,
                arrival_location,
                ..
            } => format!(
                "{} {} {} → {}",
                provider, mode, departure_location, arrival_location
            ),
        }
    }

    /// Label for the price column (what the amount covers).
    pub fn price_label(&self) -> &'static str {
        match self {
            ItemDetails::Destination { .. } => "per person",
            ItemDetails::Accommodation { .. } => "per night",
            ItemDetails::Transportation { .. } => "per ticket",
        }
    }
}

/// Something participants like or pass on (Entity)
///
/// Created in bulk when the trip is set up and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotableItem {
    pub id: ItemId,
    pub trip_id: TripId,
    /// Insertion order within the stage's item set
    pub position: usize,
    /// `true` when produced by the language model, `false` for fallback or provider data
    pub ai_generated: bool,
    pub details: ItemDetails,
}

impl VotableItem {
    pub fn new(trip_id: TripId, position: usize, details: ItemDetails) -> Self {
        Self {
            id: ItemId::generate(),
            trip_id,
            position,
            ai_generated: false,
            details,
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn ai_generated(mut self, ai_generated: bool) -> Self {
        self.ai_generated = ai_generated;
        self
    }

    pub fn stage(&self) -> Stage {
        self.details.stage()
    }

    pub fn price_for(&self, tier: BudgetTier) -> Option<f64> {
        self.details.prices().price_for(tier)
    }

    pub fn title(&self) -> String {
        self.details.title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel() -> ItemDetails {
        ItemDetails::Accommodation {
            name: "Budget Hotel".to_string(),
            category: "hotel".to_string(),
            location: "City Center".to_string(),
            description: None,
            image_url: None,
            amenities: vec!["WiFi".to_string()],
            rating: Some(4.0),
            nightly: TierPrices::new(50.0, 80.0, 120.0),
        }
    }

    #[test]
    fn test_price_projection_is_shared_across_kinds() {
        let item = VotableItem::new(TripId::new("t"), 0, hotel());
        assert_eq!(item.stage(), Stage::Accommodations);
        assert_eq!(item.price_for(BudgetTier::Budget), Some(50.0));
        assert_eq!(item.price_for(BudgetTier::MidRange), Some(80.0));
        assert_eq!(item.price_for(BudgetTier::Luxury), Some(120.0));
    }

    #[test]
    fn test_missing_tier_price() {
        let prices = TierPrices {
            budget: Some(10.0),
            ..Default::default()
        };
        assert_eq!(prices.price_for(BudgetTier::Luxury), None);
    }

    #[test]
    fn test_details_are_tagged_by_kind() {
        let json = serde_json::to_value(hotel()).unwrap();
        assert_eq!(json["kind"], "accommodation");
        let back: ItemDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back, hotel());
    }

    #[test]
    fn test_destination_title_skips_duplicate_country() {
        let details = ItemDetails::Destination {
            name: "Thailand".to_string(),
            country: "Thailand".to_string(),
            description: None,
            image_url: None,
            best_time_to_visit: None,
            highlights: vec![],
            costs: TierPrices::default(),
        };
        assert_eq!(details.title(), "Thailand");
    }
}
