//! # Response Views
//!
//! JSON shapes returned by the API. Documents are reported with their image
//! size; the bytes themselves are served by `GET /api/Document/{id}/Image`.

use checkpoint_core::{PassengerType, Transport};
use checkpoint_state::{CrossingRecord, CrossingStage, Document, DocumentAnomaly, Person, TollOffice};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A crossing with its documents and derived lifecycle flags.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CrossingView {
    pub id: Uuid,
    pub passenger_count: u32,
    #[schema(value_type = String, example = "car")]
    pub transport: Transport,
    #[schema(value_type = Object)]
    pub passenger_type: PassengerType,
    pub entry_toll_id: Option<Uuid>,
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_toll_id: Option<Uuid>,
    pub exit_time: Option<DateTime<Utc>>,
    pub person_id: Option<Uuid>,
    #[schema(value_type = String, example = "registered")]
    pub stage: CrossingStage,
    /// Entry toll is set.
    pub registered: bool,
    /// Exit toll is set.
    pub valid: bool,
    pub documents: Vec<DocumentView>,
}

impl From<CrossingRecord> for CrossingView {
    fn from(c: CrossingRecord) -> Self {
        Self {
            id: *c.id.as_uuid(),
            passenger_count: c.passenger_count,
            transport: c.transport,
            stage: c.stage(),
            registered: c.is_registered(),
            valid: c.is_valid(),
            entry_toll_id: c.entry_toll_id.map(|t| *t.as_uuid()),
            entry_time: c.entry_time,
            exit_toll_id: c.exit_toll_id.map(|t| *t.as_uuid()),
            exit_time: c.exit_time,
            person_id: c.person_id.map(|p| *p.as_uuid()),
            passenger_type: c.passenger_type,
            documents: c.documents.into_iter().map(DocumentView::from).collect(),
        }
    }
}

/// A scanned document.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentView {
    pub id: Uuid,
    pub crossing_id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub verified: bool,
    pub image_size: usize,
    pub anomalies: Vec<AnomalyView>,
}

impl From<Document> for DocumentView {
    fn from(d: Document) -> Self {
        Self {
            id: *d.id.as_uuid(),
            crossing_id: *d.crossing_id.as_uuid(),
            captured_at: d.captured_at,
            verified: d.verified,
            image_size: d.image.len(),
            anomalies: d.anomalies.into_iter().map(AnomalyView::from).collect(),
        }
    }
}

/// A defect recorded against a document.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnomalyView {
    pub id: Uuid,
    pub document_id: Uuid,
    pub description: String,
}

impl From<DocumentAnomaly> for AnomalyView {
    fn from(a: DocumentAnomaly) -> Self {
        Self {
            id: *a.id.as_uuid(),
            document_id: *a.document_id.as_uuid(),
            description: a.description,
        }
    }
}

/// A border checkpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TollOfficeView {
    pub id: Uuid,
    #[schema(example = "FR")]
    pub country: String,
}

impl From<TollOffice> for TollOfficeView {
    fn from(t: TollOffice) -> Self {
        Self {
            id: *t.id.as_uuid(),
            country: t.country.into(),
        }
    }
}

/// A traveler.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonView {
    pub id: Uuid,
    pub photo_size: usize,
    pub crossing_ids: Vec<Uuid>,
}

impl From<Person> for PersonView {
    fn from(p: Person) -> Self {
        Self {
            id: *p.id.as_uuid(),
            photo_size: p.photo.len(),
            crossing_ids: p.crossing_ids.iter().map(|c| *c.as_uuid()).collect(),
        }
    }
}

/// Result of a face search.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PersonMatchView {
    pub person_id: Uuid,
    pub score: f32,
}
