//! # Document Validation
//!
//! The official validation service is an external dependency. It is modelled
//! as the [`DocumentValidator`] trait so the workflow never knows which
//! implementation is wired in; [`MockOfficialValidator`] stands in for it in
//! development and tests.

use checkpoint_core::CountryCode;

use crate::document::Document;

/// Result of validating one document image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The document is authentic and readable.
    Success,
    /// The document was rejected, with one message per problem found.
    Failure(Vec<String>),
}

impl ValidationOutcome {
    /// Whether the outcome is [`ValidationOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Validates scanned documents against an issuing region's rules.
///
/// The workflow invokes implementations before taking the crossings write
/// lock, so a slow service does not stall other crossing operations.
pub trait DocumentValidator: Send + Sync {
    /// Validate `document` under the rules of `region`, which is the country
    /// of the crossing's entry toll.
    fn validate(&self, document: &Document, region: &CountryCode) -> ValidationOutcome;
}

/// Stand-in for the official validation service.
///
/// Rejects blank scans (empty or all-zero images) and accepts anything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockOfficialValidator;

impl DocumentValidator for MockOfficialValidator {
    fn validate(&self, document: &Document, region: &CountryCode) -> ValidationOutcome {
        if document.image.iter().all(|b| *b == 0) {
            tracing::debug!(document = %document.id, %region, "mock validator rejected blank scan");
            return ValidationOutcome::Failure(vec![format!(
                "document image is blank and cannot be read by the {region} validation service"
            )]);
        }
        ValidationOutcome::Success
    }
}
