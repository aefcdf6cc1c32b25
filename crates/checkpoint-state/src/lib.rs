#![deny(missing_docs)]

//! # checkpoint-state: Crossing Lifecycle Engine
//!
//! Owns the lifecycle of a border crossing from creation to authorized exit,
//! together with the documents and anomalies that gate it.
//!
//! ## Lifecycle
//!
//! ```text
//! Created ──register_entry──▶ Registered ──allow_exit──▶ Exited
//!                                 ▲
//!       attach_document ──────────┘ validated under the entry toll's country
//! ```
//!
//! - Entry registration and exit authorization are single-shot; a repeat is
//!   a conflict.
//! - Exit requires at least one document, every document verified, and no
//!   anomalies on any of them.
//! - Officer-reported anomalies block exit independently of `verified`.
//!
//! ## Collaborators
//!
//! Document validation ([`DocumentValidator`]) and face matching
//! ([`FaceMatcher`]) are traits; the mocks in this crate stand in for the
//! external services. The [`Registry`] of in-memory [`Store`]s plays the
//! repository role.

pub mod crossing;
pub mod document;
pub mod error;
pub mod face;
pub mod query;
pub mod reference;
pub mod registry;
pub mod store;
pub mod validation;
pub mod workflow;

pub use crossing::{CrossingRecord, CrossingStage};
pub use document::{Document, DocumentAnomaly};
pub use error::{ClearanceBlock, ErrorKind, WorkflowError};
pub use face::{FaceMatcher, MockFaceMatcher, MATCH_THRESHOLD};
pub use query::{CrossingFilter, TimeWindow, TrafficQuery};
pub use reference::{Person, RequiredDocument, TollOffice};
pub use registry::Registry;
pub use store::Store;
pub use validation::{DocumentValidator, MockOfficialValidator, ValidationOutcome};
pub use workflow::{EntryToll, NewCrossing, Workflow};
