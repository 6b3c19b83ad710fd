//! Budget tiers

use serde::{Deserialize, Serialize};

/// One of three ordinal price levels, applied uniformly across item kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum BudgetTier {
    /// `$`
    #[default]
    #[serde(rename = "$")]
    Budget,
    /// `$$`
    #[serde(rename = "$$")]
    MidRange,
    /// `$$$`
    #[serde(rename = "$$$")]
    Luxury,
}

impl BudgetTier {
    pub fn symbol(&self) -> &'static str {
        match self {
            BudgetTier::Budget => "$",
            BudgetTier::MidRange => "$$",
            BudgetTier::Luxury => "$$$",
        }
    }

    /// Wording used when describing the tier to a content generator.
    pub fn descriptor(&self) -> &'static str {
        match self {
            BudgetTier::Budget => "budget-friendly",
            BudgetTier::MidRange => "mid-range",
            BudgetTier::Luxury => "luxury",
        }
    }
}

impl std::fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::str::FromStr for BudgetTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "$" | "budget" | "low" => Ok(BudgetTier::Budget),
            "$$" | "mid" | "mid-range" | "mid_range" | "midrange" => Ok(BudgetTier::MidRange),
            "$$$" | "luxury" | "high" => Ok(BudgetTier::Luxury),
            other => Err(format!(
                "Unknown budget tier: {}. Valid: $, $$, $$$ (or budget, mid-range, luxury)",
                other
            )),
        }
    }
}
