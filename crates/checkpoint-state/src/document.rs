//! # Documents and Anomalies
//!
//! A [`Document`] is one scanned identity or cargo paper attached to a
//! crossing. Its `verified` flag and [`DocumentAnomaly`] list together decide
//! whether it clears the crossing for exit.

use checkpoint_core::{AnomalyId, CrossingId, DocumentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationOutcome;

/// Anomaly text recorded when the validator fails a document without saying why.
pub const UNSPECIFIED_FAILURE: &str = "document rejected by validation service";

/// A scanned document attached to a crossing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier.
    pub id: DocumentId,
    /// Owning crossing.
    pub crossing_id: CrossingId,
    /// Raw image bytes as uploaded.
    pub image: Vec<u8>,
    /// When the scan was received.
    pub captured_at: DateTime<Utc>,
    /// Whether the official validator accepted the document.
    pub verified: bool,
    /// Problems found with the document, from validation or officers.
    pub anomalies: Vec<DocumentAnomaly>,
}

/// A problem recorded against a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnomaly {
    /// Anomaly identifier.
    pub id: AnomalyId,
    /// Owning document.
    pub document_id: DocumentId,
    /// Free-text description.
    pub description: String,
}

impl DocumentAnomaly {
    /// Create an anomaly against `document_id`.
    pub fn new(document_id: DocumentId, description: impl Into<String>) -> Self {
        Self {
            id: AnomalyId::new(),
            document_id,
            description: description.into(),
        }
    }
}

impl Document {
    /// Record a fresh, unverified scan.
    pub fn scan(crossing_id: CrossingId, image: Vec<u8>) -> Self {
        Self {
            id: DocumentId::new(),
            crossing_id,
            image,
            captured_at: Utc::now(),
            verified: false,
            anomalies: Vec::new(),
        }
    }

    /// Apply a validator verdict.
    ///
    /// Success marks the document verified and clears its anomalies. Failure
    /// unverifies it and replaces the anomalies with one per reported error;
    /// a failure without messages still records one anomaly.
    pub fn apply_validation(&mut self, outcome: &ValidationOutcome) {
        match outcome {
            ValidationOutcome::Success => {
                self.verified = true;
                self.anomalies.clear();
            }
            ValidationOutcome::Failure(errors) => {
                self.verified = false;
                self.anomalies = if errors.is_empty() {
                    vec![DocumentAnomaly::new(self.id, UNSPECIFIED_FAILURE)]
                } else {
                    errors
                        .iter()
                        .map(|e| DocumentAnomaly::new(self.id, e.as_str()))
                        .collect()
                };
            }
        }
    }

    /// Append officer-reported anomalies, one per description as written,
    /// and return the created records. Does not change `verified`.
    pub fn report_anomalies(&mut self, descriptions: &[String]) -> Vec<DocumentAnomaly> {
        let created: Vec<DocumentAnomaly> = descriptions
            .iter()
            .map(|d| DocumentAnomaly::new(self.id, d.as_str()))
            .collect();
        self.anomalies.extend(created.iter().cloned());
        created
    }

    /// Remove one anomaly, returning it if present.
    pub fn remove_anomaly(&mut self, id: AnomalyId) -> Option<DocumentAnomaly> {
        let pos = self.anomalies.iter().position(|a| a.id == id)?;
        Some(self.anomalies.remove(pos))
    }

    /// Whether this document carries the given anomaly.
    pub fn has_anomaly(&self, id: AnomalyId) -> bool {
        self.anomalies.iter().any(|a| a.id == id)
    }

    /// Verified and free of anomalies.
    pub fn is_cleared(&self) -> bool {
        self.verified && self.anomalies.is_empty()
    }
}
