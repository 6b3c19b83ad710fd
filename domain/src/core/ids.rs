//! Identifier value objects.
//!
//! All identifiers are opaque strings. Freshly minted ids are UUID v4, but
//! ids loaded from a store are accepted as-is.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an id from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Mints a new random id.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a trip. Also the shareable part of a trip link.
    TripId
);

string_id!(
    /// Identifier of a participant row (one per person per trip).
    ParticipantId
);

string_id!(
    /// Identifier of a votable item (destination, accommodation or transportation leg).
    ItemId
);

string_id!(
    /// Reference to an authenticated account. Anonymous participants have none.
    AccountId
);
