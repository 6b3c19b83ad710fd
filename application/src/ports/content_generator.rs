//! Content generator port
//!
//! Produces candidate items for a trip from the group's free-text
//! preferences. The generator is best-effort: callers fall back to the
//! built-in catalog on any error.

use async_trait::async_trait;
use thiserror::Error;
use tripvote_domain::{BudgetTier, ItemDetails, Stage};

/// Errors that can occur during content generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Generator returned no {0} items")]
    Empty(Stage),

    #[error("Timeout")]
    Timeout,
}

/// Free-text preferences entered by the trip creator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub destinations: String,
    pub accommodations: String,
    pub transportation: String,
    pub activities: String,
    pub dietary: String,
    pub accessibility: String,
}

impl Preferences {
    /// Every category is blank.
    pub fn is_empty(&self) -> bool {
        self.labelled().all(|(_, text)| text.trim().is_empty())
    }

    fn labelled(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Destinations", self.destinations.as_str()),
            ("Accommodations", self.accommodations.as_str()),
            ("Transportation", self.transportation.as_str()),
            ("Activities", self.activities.as_str()),
            ("Dietary", self.dietary.as_str()),
            ("Accessibility", self.accessibility.as_str()),
        ]
        .into_iter()
    }

    /// Non-blank categories as "Label: text" paragraphs.
    pub fn summary(&self) -> String {
        self.labelled()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(label, text)| format!("{label}: {}", text.trim()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn for_stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::Destinations => &self.destinations,
            Stage::Accommodations => &self.accommodations,
            _ => &self.transportation,
        }
    }
}

/// One generation call for one stage.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub stage: Stage,
    pub count: usize,
    pub budget: BudgetTier,
    pub preferences: Preferences,
    pub departure_location: Option<String>,
}

impl GenerationRequest {
    pub fn new(stage: Stage, count: usize, budget: BudgetTier) -> Self {
        Self {
            stage,
            count,
            budget,
            preferences: Preferences::default(),
            departure_location: None,
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_departure_location(mut self, departure: Option<String>) -> Self {
        self.departure_location = departure;
        self
    }
}

/// Adapter producing item details. Implementations live in infrastructure.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Short name used in logs ("openai", "builtin").
    fn name(&self) -> &str;

    /// Whether items from this generator count as AI-generated.
    fn is_ai(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest)
    -> Result<Vec<ItemDetails>, GeneratorError>;
}
