#![deny(missing_docs)]

//! # checkpoint-core: Foundational Types for the Border Checkpoint Service
//!
//! Every other crate in the workspace builds on the types defined here. The
//! crate has no internal dependencies, only `serde`, `thiserror`, `chrono`
//! and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** A [`DocumentId`] cannot be passed
//!    where a [`CrossingId`] is expected. Back-references between records are
//!    expressed with these ids, never with owning pointers.
//!
//! 2. **Validated country codes.** [`CountryCode`] is the only way a country
//!    enters the system. Construction normalises case and checks shape; the
//!    stricter [`CountryCode::assigned`] also checks the ISO 3166-1 registry.
//!
//! 3. **Passenger classification is a sum type.** [`PassengerType`] carries a
//!    `kind` discriminant with one payload per variant.

pub mod country;
pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

pub use country::CountryCode;
pub use domain::{HumanCategory, MerchandiseDetails, PassengerKind, PassengerType, Transport};
pub use error::ValidationError;
pub use identity::{AnomalyId, CrossingId, DocumentId, PersonId, TollOfficeId, UserId};
pub use temporal::parse_utc;
