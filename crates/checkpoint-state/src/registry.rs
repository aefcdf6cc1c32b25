//! # Registry
//!
//! The repository collaborator: one [`Store`] per record kind, plus the
//! read-side lookups that span them.
//!
//! Lock order: a closure running under the crossings write lock may read
//! toll offices, never the reverse. No other store is locked while another
//! is held.

use std::collections::HashMap;

use checkpoint_core::{
    AnomalyId, CountryCode, CrossingId, DocumentId, PersonId, TollOfficeId,
};
use chrono::{DateTime, Utc};

use crate::crossing::CrossingRecord;
use crate::document::{Document, DocumentAnomaly};
use crate::face::{best_match, FaceMatcher};
use crate::query::{CrossingFilter, TrafficQuery};
use crate::reference::{Person, RequiredDocument, TollOffice};
use crate::store::Store;

/// All stores backing the service. Clones share data.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Crossings, each owning its documents and their anomalies.
    pub crossings: Store<CrossingId, CrossingRecord>,
    /// Border checkpoints.
    pub toll_offices: Store<TollOfficeId, TollOffice>,
    /// Travelers.
    pub persons: Store<PersonId, Person>,
    /// Required-document links, one entry per country.
    pub required_documents: Store<CountryCode, RequiredDocument>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Toll offices ────────────────────────────────────────────────

    /// Create and store a toll office.
    pub fn add_toll_office(&self, country: CountryCode) -> TollOffice {
        let toll = TollOffice::new(country);
        self.toll_offices.insert(toll.id, toll.clone());
        tracing::info!(toll_id = %toll.id, country = %toll.country, "toll office added");
        toll
    }

    /// Country of a toll office.
    pub fn toll_country(&self, id: TollOfficeId) -> Option<CountryCode> {
        self.toll_offices.get(&id).map(|t| t.country)
    }

    // ── Required documents ──────────────────────────────────────────

    /// Replace the links required by one country.
    pub fn set_required_documents(&self, required: RequiredDocument) {
        self.required_documents
            .insert(required.country.clone(), required);
    }

    /// Links required by the given countries, visiting each distinct country
    /// once in argument order. Countries without an entry contribute nothing.
    pub fn required_links(&self, countries: &[CountryCode]) -> Vec<String> {
        let mut seen: Vec<&CountryCode> = Vec::with_capacity(countries.len());
        let mut links = Vec::new();
        for country in countries {
            if seen.contains(&country) {
                continue;
            }
            seen.push(country);
            if let Some(required) = self.required_documents.get(country) {
                links.extend(required.links);
            }
        }
        links
    }

    // ── Persons ─────────────────────────────────────────────────────

    /// Create and store a person from a reference photo.
    pub fn add_person(&self, photo: Vec<u8>) -> Person {
        let person = Person::new(photo);
        self.persons.insert(person.id, person.clone());
        tracing::info!(person_id = %person.id, "person added");
        person
    }

    /// Best face match for `photo` among all persons.
    pub fn match_person(&self, matcher: &dyn FaceMatcher, photo: &[u8]) -> Option<(PersonId, f32)> {
        let persons = self.persons.list();
        best_match(matcher, &persons, photo)
    }

    /// Crossings associated with a person, or `None` if the person is unknown.
    pub fn person_crossings(&self, id: PersonId) -> Option<Vec<CrossingRecord>> {
        let person = self.persons.get(&id)?;
        Some(
            person
                .crossing_ids
                .iter()
                .filter_map(|cid| self.crossings.get(cid))
                .collect(),
        )
    }

    // ── Documents and anomalies ─────────────────────────────────────

    /// Locate a document across all crossings.
    pub fn find_document(&self, id: DocumentId) -> Option<Document> {
        self.crossings
            .find_map(|c| c.documents.iter().find(|d| d.id == id).cloned())
    }

    /// Locate an anomaly across all documents.
    pub fn find_anomaly(&self, id: AnomalyId) -> Option<DocumentAnomaly> {
        self.crossings.find_map(|c| {
            c.documents
                .iter()
                .flat_map(|d| d.anomalies.iter())
                .find(|a| a.id == id)
                .cloned()
        })
    }

    /// Every anomaly on every document.
    pub fn anomalies(&self) -> Vec<DocumentAnomaly> {
        self.crossings
            .list()
            .into_iter()
            .flat_map(|c| c.documents)
            .flat_map(|d| d.anomalies)
            .collect()
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Crossings passing `filter`.
    pub fn list_crossings(&self, filter: &CrossingFilter) -> Vec<CrossingRecord> {
        self.crossings.filter(|c| filter.matches(c))
    }

    /// Road crossings matching `query`, with the window resolved against `now`.
    pub fn crossings_between(&self, query: &TrafficQuery, now: DateTime<Utc>) -> Vec<CrossingRecord> {
        let countries: HashMap<TollOfficeId, CountryCode> = self
            .toll_offices
            .list()
            .into_iter()
            .map(|t| (t.id, t.country))
            .collect();
        let window = query.window(now);
        self.crossings.filter(|c| {
            let entry = c.entry_toll_id.and_then(|t| countries.get(&t));
            let exit = c.exit_toll_id.and_then(|t| countries.get(&t));
            query.matches(c, entry, exit, &window)
        })
    }
}
