//! Shareable trip links
//!
//! A trip is addressed by `{base_url}/trip/{trip_id}`. Anyone holding the
//! link can join the trip.

use crate::core::error::DomainError;
use crate::core::ids::TripId;

const TRIP_SEGMENT: &str = "/trip/";

/// A link that lets other people join a trip.
///
/// # Example
///
/// ```
/// use tripvote_domain::{ShareLink, TripId};
///
/// let link = ShareLink::new("https://tripvote.app/", TripId::new("abc"));
/// assert_eq!(link.to_url(), "https://tripvote.app/trip/abc");
///
/// let parsed = ShareLink::parse("https://tripvote.app/trip/abc?name=Ana").unwrap();
/// assert_eq!(parsed.trip_id().as_str(), "abc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    base_url: String,
    trip_id: TripId,
}

impl ShareLink {
    pub fn new(base_url: impl Into<String>, trip_id: TripId) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            trip_id,
        }
    }

    /// Parse a full link, or accept a bare trip id.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DomainError::InvalidShareLink("empty".to_string()));
        }

        let Some(pos) = input.rfind(TRIP_SEGMENT) else {
            if input.contains('/') || input.contains(char::is_whitespace) {
                return Err(DomainError::InvalidShareLink(input.to_string()));
            }
            return Ok(Self::new("", TripId::new(input)));
        };

        let base_url = &input[..pos];
        let id = input[pos + TRIP_SEGMENT.len()..]
            .split(['?', '#', '/'])
            .next()
            .unwrap_or_default();
        if id.is_empty() {
            return Err(DomainError::InvalidShareLink(input.to_string()));
        }

        Ok(Self::new(base_url, TripId::new(id)))
    }

    pub fn trip_id(&self) -> &TripId {
        &self.trip_id
    }

    pub fn to_url(&self) -> String {
        format!("{}{}{}", self.base_url, TRIP_SEGMENT, self.trip_id)
    }
}

impl std::fmt::Display for ShareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_url())
    }
}
