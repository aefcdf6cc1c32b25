//! # Identity Newtypes
//!
//! UUID-based identifiers for every persisted record. Each identifier is a
//! distinct type and always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a single crossing attempt.
    CrossingId
);
uuid_id!(
    /// Identifier of a scanned document attached to a crossing.
    DocumentId
);
uuid_id!(
    /// Identifier of a single anomaly recorded against a document.
    AnomalyId
);
uuid_id!(
    /// Identifier of a border checkpoint.
    TollOfficeId
);
uuid_id!(
    /// Identifier of a traveler keyed by a reference photo.
    PersonId
);
uuid_id!(
    /// Identifier of an authenticated caller.
    UserId
);
