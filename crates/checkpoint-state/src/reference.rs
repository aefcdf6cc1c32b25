//! # Reference Records
//!
//! Toll offices, required-document links, and travelers. None of these take
//! part in the crossing state machine; crossings refer to them by id.

use checkpoint_core::{CountryCode, CrossingId, PersonId, TollOfficeId};
use serde::{Deserialize, Serialize};

/// A border checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TollOffice {
    /// Toll identifier.
    pub id: TollOfficeId,
    /// Country the toll belongs to.
    pub country: CountryCode,
}

impl TollOffice {
    /// Create a toll office with a fresh id.
    pub fn new(country: CountryCode) -> Self {
        Self {
            id: TollOfficeId::new(),
            country,
        }
    }
}

/// Documents a country requires of travelers, as a list of links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredDocument {
    /// Country imposing the requirement.
    pub country: CountryCode,
    /// Links describing each required document.
    pub links: Vec<String>,
}

/// A traveler identified by a reference photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Person identifier.
    pub id: PersonId,
    /// Reference photo bytes.
    pub photo: Vec<u8>,
    /// Crossings associated with this person.
    pub crossing_ids: Vec<CrossingId>,
}

impl Person {
    /// Create a person from a reference photo.
    pub fn new(photo: Vec<u8>) -> Self {
        Self {
            id: PersonId::new(),
            photo,
            crossing_ids: Vec::new(),
        }
    }
}
