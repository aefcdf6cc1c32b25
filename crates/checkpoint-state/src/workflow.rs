//! # Crossing Workflow
//!
//! The lifecycle operations: create, register entry, attach document, allow
//! exit, report and delete anomalies, and document maintenance.
//!
//! Each mutating operation is one [`Store::try_update`] (or
//! [`Store::try_update_where`]) call, so every precondition check and the
//! mutation it guards happen under a single write lock. A failed check
//! leaves the record untouched.
//!
//! The validation collaborator is passed in per [`Workflow`] value rather
//! than held globally. It runs before the write lock is taken, against a
//! snapshot of the crossing; the guards are checked again under the lock.
//!
//! [`Store::try_update`]: crate::store::Store::try_update
//! [`Store::try_update_where`]: crate::store::Store::try_update_where

use std::collections::HashMap;

use checkpoint_core::{
    AnomalyId, CountryCode, CrossingId, DocumentId, PassengerType, PersonId, TollOfficeId,
    Transport,
};
use chrono::{DateTime, Utc};

use crate::crossing::CrossingRecord;
use crate::document::{Document, DocumentAnomaly};
use crate::error::WorkflowError;
use crate::reference::Person;
use crate::registry::Registry;
use crate::validation::{DocumentValidator, ValidationOutcome};

/// Entry toll given at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryToll {
    /// An existing toll office.
    Existing(TollOfficeId),
    /// A new toll office in this country, created alongside the crossing.
    New(CountryCode),
}

/// Input to [`Workflow::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCrossing {
    /// Number of people aboard.
    pub passenger_count: u32,
    /// How the crossing travels.
    pub transport: Transport,
    /// What the crossing carries.
    pub passenger_type: PassengerType,
    /// Entry toll, registering the crossing immediately.
    pub entry_toll: Option<EntryToll>,
    /// Entry time; defaults to now when an entry toll is given.
    pub entry_time: Option<DateTime<Utc>>,
    /// Associated traveler.
    pub person_id: Option<PersonId>,
}

/// Lifecycle operations over a [`Registry`] with an injected validator.
#[derive(Clone, Copy)]
pub struct Workflow<'a> {
    registry: &'a Registry,
    validator: &'a dyn DocumentValidator,
}

impl<'a> Workflow<'a> {
    /// Bind the registry and validator for a sequence of operations.
    pub fn new(registry: &'a Registry, validator: &'a dyn DocumentValidator) -> Self {
        Self {
            registry,
            validator,
        }
    }

    /// Fetch one crossing.
    pub fn crossing(&self, id: CrossingId) -> Result<CrossingRecord, WorkflowError> {
        self.registry
            .crossings
            .get(&id)
            .ok_or_else(|| WorkflowError::not_found("crossing", id))
    }

    /// Create a crossing, registering entry at once if a toll is given, and
    /// link it to its person. An entry time without an entry toll is ignored.
    ///
    /// Errors only when a referenced toll office or person does not exist.
    pub fn create(&self, input: NewCrossing) -> Result<CrossingRecord, WorkflowError> {
        if let Some(person_id) = input.person_id {
            if !self.registry.persons.contains(&person_id) {
                return Err(WorkflowError::not_found("person", person_id));
            }
        }
        let entry_toll = match input.entry_toll {
            Some(EntryToll::Existing(id)) => {
                if !self.registry.toll_offices.contains(&id) {
                    return Err(WorkflowError::not_found("toll office", id));
                }
                Some(id)
            }
            Some(EntryToll::New(country)) => Some(self.registry.add_toll_office(country).id),
            None => None,
        };

        let mut record = CrossingRecord::new(
            input.passenger_count,
            input.transport,
            input.passenger_type,
            input.person_id,
        );
        if let Some(toll) = entry_toll {
            record.register_entry(toll, input.entry_time.unwrap_or_else(Utc::now))?;
        }
        self.registry.crossings.insert(record.id, record.clone());

        if let Some(person_id) = record.person_id {
            let crossing_id = record.id;
            self.registry.persons.try_update(&person_id, |p| {
                p.crossing_ids.push(crossing_id);
                Ok::<_, WorkflowError>(())
            });
        }

        tracing::info!(
            crossing_id = %record.id,
            transport = %record.transport,
            stage = %record.stage(),
            "crossing created"
        );
        Ok(record)
    }

    /// Register entry at `toll` and validate every attached document under
    /// the toll's country.
    ///
    /// Errors: crossing missing (not found), already registered (conflict),
    /// toll missing (not found), in that order.
    pub fn register_entry(
        &self,
        id: CrossingId,
        toll: TollOfficeId,
        time: Option<DateTime<Utc>>,
    ) -> Result<CrossingRecord, WorkflowError> {
        let time = time.unwrap_or_else(Utc::now);
        let snapshot = self.crossing(id)?;
        if let Some(existing) = snapshot.entry_toll_id {
            return Err(WorkflowError::AlreadyRegistered { id, toll: existing });
        }
        let region = self
            .registry
            .toll_country(toll)
            .ok_or_else(|| WorkflowError::not_found("toll office", toll))?;
        let outcomes: HashMap<DocumentId, ValidationOutcome> = snapshot
            .documents
            .iter()
            .map(|doc| (doc.id, self.validator.validate(doc, &region)))
            .collect();

        let record = self
            .registry
            .crossings
            .try_update(&id, |record| {
                record.register_entry(toll, time)?;
                // Documents attached after the snapshot are validated here.
                record.apply_validations(&outcomes, self.validator, &region);
                Ok(record.clone())
            })
            .unwrap_or_else(|| Err(WorkflowError::not_found("crossing", id)))?;

        tracing::info!(
            crossing_id = %id,
            toll_id = %toll,
            documents = record.documents.len(),
            cleared = record.documents_cleared(),
            "entry registered"
        );
        Ok(record)
    }

    /// Attach a scanned document, validating it at once if the crossing is
    /// already registered.
    pub fn attach_document(
        &self,
        crossing_id: CrossingId,
        image: Vec<u8>,
    ) -> Result<Document, WorkflowError> {
        let snapshot = self.crossing(crossing_id)?;
        let mut document = Document::scan(crossing_id, image);
        if let Some(toll) = snapshot.entry_toll_id {
            let outcome = self.validator.validate(&document, &self.entry_region(toll)?);
            document.apply_validation(&outcome);
        }

        let document = self
            .registry
            .crossings
            .try_update(&crossing_id, |record| {
                // Entry registered since the snapshot.
                if let (None, Some(toll)) = (snapshot.entry_toll_id, record.entry_toll_id) {
                    let outcome = self.validator.validate(&document, &self.entry_region(toll)?);
                    document.apply_validation(&outcome);
                }
                record.documents.push(document.clone());
                Ok(document)
            })
            .unwrap_or_else(|| Err(WorkflowError::not_found("crossing", crossing_id)))?;

        tracing::info!(
            crossing_id = %crossing_id,
            document_id = %document.id,
            bytes = document.image.len(),
            verified = document.verified,
            anomalies = document.anomalies.len(),
            "document attached"
        );
        Ok(document)
    }

    fn entry_region(&self, toll: TollOfficeId) -> Result<CountryCode, WorkflowError> {
        self.registry
            .toll_country(toll)
            .ok_or_else(|| WorkflowError::not_found("toll office", toll))
    }

    /// Authorize exit at `toll`.
    ///
    /// Errors, first failing check wins: crossing missing (not found), not
    /// registered (unprocessable), documents not cleared (forbidden),
    /// already exited (conflict), toll missing (not found).
    pub fn allow_exit(
        &self,
        id: CrossingId,
        toll: TollOfficeId,
        time: Option<DateTime<Utc>>,
    ) -> Result<CrossingRecord, WorkflowError> {
        let time = time.unwrap_or_else(Utc::now);
        let result = self
            .registry
            .crossings
            .try_update(&id, |record| {
                record.ensure_can_exit()?;
                if !self.registry.toll_offices.contains(&toll) {
                    return Err(WorkflowError::not_found("toll office", toll));
                }
                record.allow_exit(toll, time)?;
                Ok(record.clone())
            })
            .unwrap_or_else(|| Err(WorkflowError::not_found("crossing", id)));

        match &result {
            Ok(_) => tracing::info!(crossing_id = %id, toll_id = %toll, "exit allowed"),
            Err(e) => tracing::warn!(crossing_id = %id, toll_id = %toll, error = %e, "exit refused"),
        }
        result
    }

    /// Append officer-reported anomalies to a document.
    ///
    /// Descriptions are stored as given, whitespace included.
    ///
    /// Errors: document missing (not found), empty list (unprocessable). On
    /// error nothing is recorded.
    pub fn report_anomalies(
        &self,
        document_id: DocumentId,
        descriptions: Vec<String>,
    ) -> Result<Vec<DocumentAnomaly>, WorkflowError> {
        let created = self
            .registry
            .crossings
            .try_update_where(
                |c| c.has_document(document_id),
                |c| {
                    if descriptions.is_empty() {
                        return Err(WorkflowError::EmptyAnomalyReport);
                    }
                    let document = c
                        .document_mut(document_id)
                        .ok_or_else(|| WorkflowError::not_found("document", document_id))?;
                    Ok(document.report_anomalies(&descriptions))
                },
            )
            .unwrap_or_else(|| Err(WorkflowError::not_found("document", document_id)))?;

        tracing::info!(
            document_id = %document_id,
            count = created.len(),
            "anomalies reported"
        );
        Ok(created)
    }

    /// Remove one anomaly. The document's `verified` flag is left as is.
    pub fn delete_anomaly(&self, id: AnomalyId) -> Result<DocumentAnomaly, WorkflowError> {
        let removed = self
            .registry
            .crossings
            .try_update_where(
                |c| c.documents.iter().any(|d| d.has_anomaly(id)),
                |c| {
                    c.documents
                        .iter_mut()
                        .find_map(|d| d.remove_anomaly(id))
                        .ok_or_else(|| WorkflowError::not_found("anomaly", id))
                },
            )
            .unwrap_or_else(|| Err(WorkflowError::not_found("anomaly", id)))?;

        tracing::info!(anomaly_id = %id, document_id = %removed.document_id, "anomaly deleted");
        Ok(removed)
    }

    /// Detach and discard a document.
    pub fn delete_document(&self, id: DocumentId) -> Result<Document, WorkflowError> {
        let removed = self
            .registry
            .crossings
            .try_update_where(
                |c| c.has_document(id),
                |c| {
                    let pos = c
                        .documents
                        .iter()
                        .position(|d| d.id == id)
                        .ok_or_else(|| WorkflowError::not_found("document", id))?;
                    Ok(c.documents.remove(pos))
                },
            )
            .unwrap_or_else(|| Err(WorkflowError::not_found("document", id)))?;

        tracing::info!(document_id = %id, crossing_id = %removed.crossing_id, "document deleted");
        Ok(removed)
    }

    /// Overwrite a document's `verified` flag. Anomalies are untouched.
    pub fn set_document_verified(
        &self,
        id: DocumentId,
        verified: bool,
    ) -> Result<Document, WorkflowError> {
        let updated = self
            .registry
            .crossings
            .try_update_where(
                |c| c.has_document(id),
                |c| {
                    let document = c
                        .document_mut(id)
                        .ok_or_else(|| WorkflowError::not_found("document", id))?;
                    document.verified = verified;
                    Ok(document.clone())
                },
            )
            .unwrap_or_else(|| Err(WorkflowError::not_found("document", id)))?;

        tracing::info!(document_id = %id, verified, "document patched");
        Ok(updated)
    }

    /// Replace the set of crossings linked to a person, keeping each
    /// crossing's `person_id` in step. Duplicates are dropped.
    ///
    /// Errors: person missing (not found); a listed crossing that does not
    /// exist or belongs to another person (unprocessable). On error nothing
    /// is changed.
    pub fn relink_person(
        &self,
        id: PersonId,
        crossing_ids: Vec<CrossingId>,
    ) -> Result<Person, WorkflowError> {
        let person = self
            .registry
            .persons
            .get(&id)
            .ok_or_else(|| WorkflowError::not_found("person", id))?;

        let mut linked: Vec<CrossingId> = Vec::with_capacity(crossing_ids.len());
        for crossing_id in crossing_ids {
            if linked.contains(&crossing_id) {
                continue;
            }
            let crossing = self.registry.crossings.get(&crossing_id).ok_or_else(|| {
                WorkflowError::InvalidRequest(format!("crossing {crossing_id} does not exist"))
            })?;
            if crossing.person_id.is_some_and(|owner| owner != id) {
                return Err(WorkflowError::InvalidRequest(format!(
                    "crossing {crossing_id} belongs to another person"
                )));
            }
            linked.push(crossing_id);
        }

        for dropped in person.crossing_ids.iter().filter(|c| !linked.contains(*c)) {
            self.registry.crossings.try_update(dropped, |c| {
                c.person_id = None;
                Ok::<_, WorkflowError>(())
            });
        }
        for crossing_id in &linked {
            self.registry.crossings.try_update(crossing_id, |c| {
                c.person_id = Some(id);
                Ok::<_, WorkflowError>(())
            });
        }
        let updated = self
            .registry
            .persons
            .try_update(&id, |p| {
                p.crossing_ids = linked;
                Ok(p.clone())
            })
            .unwrap_or_else(|| Err(WorkflowError::not_found("person", id)))?;

        tracing::info!(person_id = %id, crossings = updated.crossing_ids.len(), "person relinked");
        Ok(updated)
    }
}
