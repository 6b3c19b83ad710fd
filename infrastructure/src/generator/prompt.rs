//! Prompt construction and strict response parsing for chat-completion
//! generators
//!
//! The model is asked for a bare JSON array whose rows follow a per-stage
//! schema. Anything else is rejected as [`GeneratorError::Malformed`] so the
//! caller can fall back to the built-in catalog.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tripvote_application::{GenerationRequest, GeneratorError};
use tripvote_domain::{ItemDetails, Stage, TierPrices};

const IMAGE_URL_HINT: &str = "https://images.unsplash.com/1600x900/?travel,name&fit=crop";

/// System prompt describing the row schema for the request's stage.
pub fn system_prompt(request: &GenerationRequest) -> String {
    let fields = match request.stage {
        Stage::Destinations => {
            "- name: string (destination name)\n\
             - country: string\n\
             - description: string (2-3 sentences)\n\
             - estimated_cost_budget: number (USD, budget travel)\n\
             - estimated_cost_mid_range: number (USD, mid-range travel)\n\
             - estimated_cost_luxury: number (USD, luxury travel)\n\
             - best_time_to_visit: string (best months or seasons)\n\
             - highlights: array of strings (3-4 main attractions)\n\
             - image_url: string"
        }
        Stage::Accommodations => {
            "- name: string\n\
             - type: string (hotel, resort, hostel, apartment, villa)\n\
             - location: string (area or neighbourhood)\n\
             - description: string (1-2 sentences)\n\
             - price_per_night_budget: number (USD)\n\
             - price_per_night_mid_range: number (USD)\n\
             - price_per_night_luxury: number (USD)\n\
             - amenities: array of strings\n\
             - rating: number (0-5)\n\
             - image_url: string"
        }
        Stage::Transportation | Stage::Completed => {
            "- type: string (flight, train, bus, car, ferry)\n\
             - provider: string\n\
             - departure_location: string\n\
             - arrival_location: string\n\
             - departure_time: string (HH:MM)\n\
             - arrival_time: string (HH:MM)\n\
             - duration_minutes: integer\n\
             - price_budget: number (USD)\n\
             - price_mid_range: number (USD)\n\
             - price_luxury: number (USD)\n\
             - description: string"
        }
    };

    format!(
        "You are a travel expert. Generate exactly {count} diverse {stage} options as a JSON array. \
         Each element must have these exact fields:\n{fields}\n\
         Use image URLs of the form \"{IMAGE_URL_HINT}\". \
         Return ONLY a valid JSON array with exactly {count} elements. No other text.",
        count = request.count,
        stage = request.stage,
    )
}

/// User prompt carrying the group's preferences and trip facts.
pub fn user_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "Generate {} {} {} options for a group trip.",
        request.count,
        request.budget.descriptor(),
        request.stage
    );

    if request.stage == Stage::Transportation
        && let Some(departure) = &request.departure_location
    {
        prompt.push_str(&format!("\nThe group departs from {}.", departure));
    }

    let preferences = request.preferences.summary();
    if preferences.is_empty() {
        prompt.push_str("\nNo stated preferences; offer a varied mix.");
    } else {
        prompt.push_str("\n\nPreferences:\n");
        prompt.push_str(&preferences);
    }
    if request.stage == Stage::Destinations {
        prompt.push_str(
            "\n\nInclude a mix of beach destinations, cultural cities, mountain locations, \
             tropical islands, historical sites and adventure spots.",
        );
    }
    prompt
}

#[derive(Deserialize)]
struct DestinationRow {
    name: String,
    country: String,
    description: Option<String>,
    estimated_cost_budget: f64,
    estimated_cost_mid_range: f64,
    estimated_cost_luxury: f64,
    best_time_to_visit: Option<String>,
    #[serde(default)]
    highlights: Vec<String>,
    image_url: Option<String>,
}

#[derive(Deserialize)]
struct AccommodationRow {
    name: String,
    #[serde(rename = "type")]
    category: String,
    location: String,
    description: Option<String>,
    price_per_night_budget: f64,
    price_per_night_mid_range: f64,
    price_per_night_luxury: f64,
    #[serde(default)]
    amenities: Vec<String>,
    rating: Option<f32>,
    image_url: Option<String>,
}

#[derive(Deserialize)]
struct TransportationRow {
    #[serde(rename = "type")]
    mode: String,
    provider: String,
    departure_location: String,
    arrival_location: String,
    departure_time: Option<String>,
    arrival_time: Option<String>,
    duration_minutes: Option<u32>,
    price_budget: f64,
    price_mid_range: f64,
    price_luxury: f64,
    description: Option<String>,
}

impl From<DestinationRow> for ItemDetails {
    fn from(row: DestinationRow) -> Self {
        ItemDetails::Destination {
            name: row.name,
            country: row.country,
            description: row.description,
            image_url: row.image_url,
            best_time_to_visit: row.best_time_to_visit,
            highlights: row.highlights,
            costs: TierPrices::new(
                row.estimated_cost_budget,
                row.estimated_cost_mid_range,
                row.estimated_cost_luxury,
            ),
        }
    }
}

impl From<AccommodationRow> for ItemDetails {
    fn from(row: AccommodationRow) -> Self {
        ItemDetails::Accommodation {
            name: row.name,
            category: row.category,
            location: row.location,
            description: row.description,
            image_url: row.image_url,
            amenities: row.amenities,
            rating: row.rating,
            nightly: TierPrices::new(
                row.price_per_night_budget,
                row.price_per_night_mid_range,
                row.price_per_night_luxury,
            ),
        }
    }
}

impl From<TransportationRow> for ItemDetails {
    fn from(row: TransportationRow) -> Self {
        ItemDetails::Transportation {
            mode: row.mode,
            provider: row.provider,
            departure_location: row.departure_location,
            arrival_location: row.arrival_location,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            duration_minutes: row.duration_minutes,
            description: row.description,
            fares: TierPrices::new(row.price_budget, row.price_mid_range, row.price_luxury),
        }
    }
}

fn parse_rows<R>(content: &str) -> Result<Vec<ItemDetails>, GeneratorError>
where
    R: DeserializeOwned + Into<ItemDetails>,
{
    let rows: Vec<R> =
        serde_json::from_str(content).map_err(|e| GeneratorError::Malformed(e.to_string()))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Parse the model's message content as a JSON array for `stage`.
pub fn parse_items(stage: Stage, content: &str) -> Result<Vec<ItemDetails>, GeneratorError> {
    let content = content.trim();
    if !content.starts_with('[') {
        return Err(GeneratorError::Malformed(
            "response is not a JSON array".to_string(),
        ));
    }

    let items = match stage {
        Stage::Destinations => parse_rows::<DestinationRow>(content)?,
        Stage::Accommodations => parse_rows::<AccommodationRow>(content)?,
        Stage::Transportation => parse_rows::<TransportationRow>(content)?,
        Stage::Completed => Vec::new(),
    };
    if items.is_empty() {
        return Err(GeneratorError::Empty(stage));
    }
    Ok(items)
}
