//! # Crossing Lifecycle
//!
//! A [`CrossingRecord`] moves through three stages, derived from which toll
//! fields are set rather than stored separately:
//!
//! ```text
//! Created ──register_entry──▶ Registered ──allow_exit──▶ Exited
//! ```
//!
//! Both transitions are single-shot. Exit is further gated on document
//! clearance: at least one document, every document verified, no anomalies.

use std::collections::HashMap;

use checkpoint_core::{
    CountryCode, CrossingId, DocumentId, PassengerType, PersonId, TollOfficeId, Transport,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{ClearanceBlock, WorkflowError};
use crate::validation::{DocumentValidator, ValidationOutcome};

/// Lifecycle stage of a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingStage {
    /// Recorded, no entry toll yet.
    Created,
    /// Entry toll and time recorded.
    Registered,
    /// Exit authorized. Terminal.
    Exited,
}

impl CrossingStage {
    /// Return the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Registered => "registered",
            Self::Exited => "exited",
        }
    }
}

impl std::fmt::Display for CrossingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One crossing attempt through a pair of border tolls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingRecord {
    /// Crossing identifier.
    pub id: CrossingId,
    /// Number of people aboard.
    pub passenger_count: u32,
    /// How the crossing travels.
    pub transport: Transport,
    /// What the crossing carries.
    pub passenger_type: PassengerType,
    /// Toll where entry was registered.
    pub entry_toll_id: Option<TollOfficeId>,
    /// When entry was registered.
    pub entry_time: Option<DateTime<Utc>>,
    /// Toll where exit was authorized.
    pub exit_toll_id: Option<TollOfficeId>,
    /// When exit was authorized.
    pub exit_time: Option<DateTime<Utc>>,
    /// Scanned documents, owned by this crossing.
    pub documents: Vec<Document>,
    /// Associated traveler, if any.
    pub person_id: Option<PersonId>,
}

impl CrossingRecord {
    /// Create a crossing in the [`CrossingStage::Created`] stage.
    pub fn new(
        passenger_count: u32,
        transport: Transport,
        passenger_type: PassengerType,
        person_id: Option<PersonId>,
    ) -> Self {
        Self {
            id: CrossingId::new(),
            passenger_count,
            transport,
            passenger_type,
            entry_toll_id: None,
            entry_time: None,
            exit_toll_id: None,
            exit_time: None,
            documents: Vec::new(),
            person_id,
        }
    }

    /// Current stage, derived from the toll fields.
    pub fn stage(&self) -> CrossingStage {
        if self.exit_toll_id.is_some() {
            CrossingStage::Exited
        } else if self.entry_toll_id.is_some() {
            CrossingStage::Registered
        } else {
            CrossingStage::Created
        }
    }

    /// Entry toll is set.
    pub fn is_registered(&self) -> bool {
        self.entry_toll_id.is_some()
    }

    /// Exit toll is set.
    pub fn is_valid(&self) -> bool {
        self.exit_toll_id.is_some()
    }

    /// Record entry at `toll`.
    ///
    /// Transitions: Created → Registered.
    ///
    /// Does not validate documents; see [`CrossingRecord::apply_validations`].
    pub fn register_entry(
        &mut self,
        toll: TollOfficeId,
        time: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        if let Some(existing) = self.entry_toll_id {
            return Err(WorkflowError::AlreadyRegistered {
                id: self.id,
                toll: existing,
            });
        }
        self.entry_toll_id = Some(toll);
        self.entry_time = Some(time);
        Ok(())
    }

    /// Overwrite each attached document's verdict with its precomputed
    /// outcome. Documents missing from `outcomes` are validated here.
    pub fn apply_validations(
        &mut self,
        outcomes: &HashMap<DocumentId, ValidationOutcome>,
        validator: &dyn DocumentValidator,
        region: &CountryCode,
    ) {
        for doc in &mut self.documents {
            match outcomes.get(&doc.id) {
                Some(outcome) => doc.apply_validation(outcome),
                None => {
                    let outcome = validator.validate(doc, region);
                    doc.apply_validation(&outcome);
                }
            }
        }
    }

    /// Check the exit preconditions in order: registered, documents cleared,
    /// not yet exited.
    pub fn ensure_can_exit(&self) -> Result<(), WorkflowError> {
        if !self.is_registered() {
            return Err(WorkflowError::NotRegistered { id: self.id });
        }
        if let Some(reason) = self.clearance_block() {
            return Err(WorkflowError::DocumentsNotCleared {
                id: self.id,
                reason,
            });
        }
        if let Some(existing) = self.exit_toll_id {
            return Err(WorkflowError::AlreadyExited {
                id: self.id,
                toll: existing,
            });
        }
        Ok(())
    }

    /// Authorize exit at `toll`.
    ///
    /// Transitions: Registered → Exited.
    pub fn allow_exit(&mut self, toll: TollOfficeId, time: DateTime<Utc>) -> Result<(), WorkflowError> {
        self.ensure_can_exit()?;
        self.exit_toll_id = Some(toll);
        self.exit_time = Some(time);
        Ok(())
    }

    /// Non-empty, and every document verified with no anomalies.
    pub fn documents_cleared(&self) -> bool {
        self.clearance_block().is_none()
    }

    /// First reason the documents fail to clear the crossing, if any.
    pub fn clearance_block(&self) -> Option<ClearanceBlock> {
        if self.documents.is_empty() {
            return Some(ClearanceBlock::NoDocuments);
        }
        let unverified = self.documents.iter().filter(|d| !d.verified).count();
        if unverified > 0 {
            return Some(ClearanceBlock::Unverified(unverified));
        }
        let anomalous = self
            .documents
            .iter()
            .filter(|d| !d.anomalies.is_empty())
            .count();
        if anomalous > 0 {
            return Some(ClearanceBlock::Anomalies(anomalous));
        }
        None
    }

    /// Whether this crossing owns the document.
    pub fn has_document(&self, id: DocumentId) -> bool {
        self.documents.iter().any(|d| d.id == id)
    }

    /// Mutable access to an owned document.
    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Whether `toll` is the entry or the exit toll.
    pub fn touches_toll(&self, toll: TollOfficeId) -> bool {
        self.entry_toll_id == Some(toll) || self.exit_toll_id == Some(toll)
    }
}
