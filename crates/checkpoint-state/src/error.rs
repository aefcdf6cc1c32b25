//! # Workflow Errors
//!
//! Every refusal the crossing lifecycle can produce. Each variant maps to one
//! [`ErrorKind`], which the HTTP layer translates to a status code.

use checkpoint_core::{CrossingId, TollOfficeId, ValidationError};
use thiserror::Error;

/// Coarse classification of a [`WorkflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced record does not exist.
    NotFound,
    /// The operation was already performed on this record.
    Conflict,
    /// The request is well-formed but semantically invalid.
    Unprocessable,
    /// The request is refused on policy grounds.
    Forbidden,
}

/// Why a crossing's documents do not clear it for exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearanceBlock {
    /// No document has been attached.
    NoDocuments,
    /// Some documents have not been verified.
    Unverified(usize),
    /// Some documents carry anomalies.
    Anomalies(usize),
}

impl std::fmt::Display for ClearanceBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDocuments => f.write_str("no documents attached"),
            Self::Unverified(n) => write!(f, "{n} document(s) not verified"),
            Self::Anomalies(n) => write!(f, "{n} document(s) with anomalies"),
        }
    }
}

/// Errors raised by lifecycle operations and queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// A referenced record does not exist.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Record kind, e.g. "crossing".
        resource: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Entry was already registered.
    #[error("crossing {id} is already registered at entry toll {toll}")]
    AlreadyRegistered {
        /// The crossing.
        id: CrossingId,
        /// Toll where entry was recorded.
        toll: TollOfficeId,
    },

    /// Exit was already authorized.
    #[error("crossing {id} already exited through toll {toll}")]
    AlreadyExited {
        /// The crossing.
        id: CrossingId,
        /// Toll where exit was recorded.
        toll: TollOfficeId,
    },

    /// Exit requested before entry.
    #[error("crossing {id} has no registered entry")]
    NotRegistered {
        /// The crossing.
        id: CrossingId,
    },

    /// Documents do not clear the crossing for exit.
    #[error("crossing {id} cannot exit: {reason}")]
    DocumentsNotCleared {
        /// The crossing.
        id: CrossingId,
        /// First failing clearance condition.
        reason: ClearanceBlock,
    },

    /// An anomaly report contained no descriptions.
    #[error("at least one anomaly description is required")]
    EmptyAnomalyReport,

    /// Request parameters are inconsistent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A domain primitive failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl WorkflowError {
    /// Shorthand for [`WorkflowError::NotFound`].
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyRegistered { .. } | Self::AlreadyExited { .. } => ErrorKind::Conflict,
            Self::DocumentsNotCleared { .. } => ErrorKind::Forbidden,
            Self::NotRegistered { .. }
            | Self::EmptyAnomalyReport
            | Self::InvalidRequest(_)
            | Self::Validation(_) => ErrorKind::Unprocessable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_lifecycle_semantics() {
        let id = CrossingId::new();
        let toll = TollOfficeId::new();
        assert_eq!(
            WorkflowError::not_found("crossing", id).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            WorkflowError::AlreadyRegistered { id, toll }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            WorkflowError::AlreadyExited { id, toll }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            WorkflowError::NotRegistered { id }.kind(),
            ErrorKind::Unprocessable
        );
        assert_eq!(
            WorkflowError::DocumentsNotCleared {
                id,
                reason: ClearanceBlock::NoDocuments
            }
            .kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(
            WorkflowError::EmptyAnomalyReport.kind(),
            ErrorKind::Unprocessable
        );
    }

    #[test]
    fn validation_errors_convert() {
        let err: WorkflowError = ValidationError::InvalidCountryCode("f".into()).into();
        assert_eq!(err.kind(), ErrorKind::Unprocessable);
        assert!(err.to_string().contains("\"f\""));
    }

    #[test]
    fn not_found_message_names_resource() {
        let id = TollOfficeId::new();
        let err = WorkflowError::not_found("toll office", id);
        assert_eq!(err.to_string(), format!("toll office {id} not found"));
    }

    #[test]
    fn clearance_block_display() {
        assert_eq!(ClearanceBlock::Unverified(2).to_string(), "2 document(s) not verified");
    }
}
