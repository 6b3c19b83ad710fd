//! Built-in item lists used when the content generator fails.
//!
//! These are fixed and never depend on the upstream provider, so a trip can
//! always proceed to voting.

use crate::item::entities::{ItemDetails, TierPrices};
use crate::trip::stage::Stage;

fn destination(
    name: &str,
    country: &str,
    description: &str,
    costs: (f64, f64, f64),
    best_time: &str,
    highlights: &[&str],
) -> ItemDetails {
    ItemDetails::Destination {
        name: name.to_string(),
        country: country.to_string(),
        description: Some(description.to_string()),
        image_url: Some(format!(
            "https://images.unsplash.com/1600x900/?travel,{}&fit=crop",
            name.to_lowercase().replace(' ', "-")
        )),
        best_time_to_visit: Some(best_time.to_string()),
        highlights: highlights.iter().map(|h| h.to_string()).collect(),
        costs: TierPrices::new(costs.0, costs.1, costs.2),
    }
}

/// Eight well-known destinations.
pub fn destinations() -> Vec<ItemDetails> {
    vec![
        destination(
            "Santorini",
            "Greece",
            "A Greek island of white-washed buildings, blue domes and sunsets over the Aegean Sea.",
            (600.0, 1000.0, 1800.0),
            "April to October",
            &["Oia Sunset", "Blue Dome Churches", "Red Beach", "Wine Tasting"],
        ),
        destination(
            "Tokyo",
            "Japan",
            "A metropolis blending traditional culture with cutting-edge technology and incredible food.",
            (800.0, 1300.0, 2200.0),
            "March to May, September to November",
            &["Shibuya Crossing", "Tokyo Tower", "Traditional Temples", "Amazing Food"],
        ),
        destination(
            "Bali",
            "Indonesia",
            "Beaches, ancient temples, lush rice terraces and a vibrant cultural heritage.",
            (400.0, 700.0, 1200.0),
            "April to October",
            &["Uluwatu Temple", "Rice Terraces", "Beach Clubs", "Traditional Markets"],
        ),
        destination(
            "Paris",
            "France",
            "World-class museums, iconic landmarks and exceptional cuisine and wine.",
            (700.0, 1200.0, 2000.0),
            "April to June, September to October",
            &["Eiffel Tower", "Louvre Museum", "Notre-Dame", "Champs-Élysées"],
        ),
        destination(
            "New York City",
            "United States",
            "Broadway shows, world-class museums, diverse neighborhoods and an iconic skyline.",
            (900.0, 1500.0, 2500.0),
            "April to June, September to November",
            &["Times Square", "Central Park", "Statue of Liberty", "Broadway Shows"],
        ),
        destination(
            "Dubai",
            "United Arab Emirates",
            "Luxury shopping, ultramodern architecture and a lively nightlife scene.",
            (800.0, 1400.0, 2800.0),
            "November to March",
            &["Burj Khalifa", "Dubai Mall", "Desert Safari", "Marina Walk"],
        ),
        destination(
            "Barcelona",
            "Spain",
            "A Mediterranean city famous for its architecture, beaches and cultural heritage.",
            (500.0, 900.0, 1600.0),
            "May to September",
            &["Sagrada Familia", "Park Güell", "Las Ramblas", "Gothic Quarter"],
        ),
        destination(
            "Thailand",
            "Thailand",
            "Tropical beaches, royal palaces, ancient ruins and ornate temples.",
            (350.0, 600.0, 1100.0),
            "November to March",
            &["Bangkok Temples", "Phi Phi Islands", "Floating Markets", "Thai Cuisine"],
        ),
    ]
}

fn accommodation(
    name: &str,
    category: &str,
    location: &str,
    description: &str,
    nightly: (f64, f64, f64),
    amenities: &[&str],
    rating: f32,
) -> ItemDetails {
    ItemDetails::Accommodation {
        name: name.to_string(),
        category: category.to_string(),
        location: location.to_string(),
        description: Some(description.to_string()),
        image_url: Some(format!(
            "https://images.unsplash.com/1600x900/?{},{}&fit=crop",
            category,
            name.to_lowercase().replace(' ', "-")
        )),
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        rating: Some(rating),
        nightly: TierPrices::new(nightly.0, nightly.1, nightly.2),
    }
}

/// Six accommodation styles that fit any destination.
pub fn accommodations() -> Vec<ItemDetails> {
    vec![
        accommodation(
            "Budget Hotel",
            "hotel",
            "City Center",
            "Comfortable budget accommodation with basic amenities.",
            (50.0, 80.0, 120.0),
            &["WiFi", "Breakfast", "Air Conditioning"],
            4.0,
        ),
        accommodation(
            "Luxury Resort",
            "resort",
            "Beachfront",
            "Premium resort with world-class amenities and service.",
            (200.0, 350.0, 600.0),
            &["WiFi", "Spa", "Pool", "Restaurant", "Room Service"],
            4.8,
        ),
        accommodation(
            "Social Hostel",
            "hostel",
            "Old Town",
            "Lively hostel with private rooms and a shared kitchen.",
            (25.0, 45.0, 70.0),
            &["WiFi", "Shared Kitchen", "Lockers"],
            4.2,
        ),
        accommodation(
            "Family Apartment",
            "apartment",
            "Residential Quarter",
            "Spacious apartment with room for the whole group.",
            (90.0, 140.0, 220.0),
            &["WiFi", "Kitchen", "Washer", "Balcony"],
            4.5,
        ),
        accommodation(
            "Boutique Inn",
            "hotel",
            "Historic District",
            "Small design hotel with personal service.",
            (110.0, 170.0, 280.0),
            &["WiFi", "Breakfast", "Rooftop Bar"],
            4.6,
        ),
        accommodation(
            "Countryside Villa",
            "villa",
            "Outskirts",
            "Private villa with garden and pool, a short drive from town.",
            (160.0, 260.0, 450.0),
            &["Pool", "Garden", "Parking", "Kitchen"],
            4.7,
        ),
    ]
}

/// Four generic ways of getting there from `departure`.
pub fn transportation(departure: &str) -> Vec<ItemDetails> {
    let leg = |mode: &str,
               provider: &str,
               times: (&str, &str),
               minutes: u32,
               fares: (f64, f64, f64),
               description: &str| ItemDetails::Transportation {
        mode: mode.to_string(),
        provider: provider.to_string(),
        departure_location: departure.to_string(),
        arrival_location: "Destination".to_string(),
        departure_time: Some(times.0.to_string()),
        arrival_time: Some(times.1.to_string()),
        duration_minutes: Some(minutes),
        description: Some(description.to_string()),
        fares: TierPrices::new(fares.0, fares.1, fares.2),
    };

    vec![
        leg(
            "flight",
            "Airlines",
            ("08:00", "14:00"),
            360,
            (300.0, 500.0, 800.0),
            "Direct flight to your destination",
        ),
        leg(
            "flight",
            "Airlines",
            ("06:15", "16:40"),
            625,
            (220.0, 380.0, 650.0),
            "One-stop flight, cheaper but longer",
        ),
        leg(
            "train",
            "Rail",
            ("09:30", "18:00"),
            510,
            (120.0, 200.0, 340.0),
            "Scenic train journey with dining car",
        ),
        leg(
            "bus",
            "Coach Lines",
            ("21:00", "09:00"),
            720,
            (60.0, 90.0, 140.0),
            "Overnight coach with reclining seats",
        ),
    ]
}

/// Fallback list for any voting stage. Empty for `Completed`.
pub fn for_stage(stage: Stage, departure: &str) -> Vec<ItemDetails> {
    match stage {
        Stage::Destinations => destinations(),
        Stage::Accommodations => accommodations(),
        Stage::Transportation => transportation(departure),
        Stage::Completed => Vec::new(),
    }
}
