//! # Document API
//!
//! Document inspection, image download, generic patch, deletion, and
//! officer anomaly reports.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use checkpoint_core::DocumentId;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::AppState;
use crate::views::{AnomalyView, DocumentView};

/// Anomaly report body: either a bare list of descriptions or an object
/// wrapping one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnomalyReport {
    List(Vec<String>),
    Wrapped { anomalies: Vec<String> },
}

impl AnomalyReport {
    fn into_descriptions(self) -> Vec<String> {
        match self {
            Self::List(list) | Self::Wrapped { anomalies: list } => list,
        }
    }
}

/// Generic document patch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PatchDocumentRequest {
    pub verified: Option<bool>,
}

impl Validate for PatchDocumentRequest {
    fn validate(&self) -> Result<(), String> {
        if self.verified.is_none() {
            return Err("patch must set at least one field".to_string());
        }
        Ok(())
    }
}

/// Build the documents router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/Document/:id",
            get(get_document).patch(patch_document).delete(delete_document),
        )
        .route("/api/Document/:id/Image", get(get_document_image))
        .route("/api/Document/:id/Non-compliant", post(report_anomalies))
}

fn document_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("document {id} not found"))
}

/// GET /api/Document/:id: Get a document and its anomalies.
#[utoipa::path(
    get,
    path = "/api/Document/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document found", body = DocumentView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentView>, AppError> {
    state
        .registry
        .find_document(DocumentId::from_uuid(id))
        .map(|d| Json(d.into()))
        .ok_or_else(|| document_not_found(id))
}

/// GET /api/Document/:id/Image: Download the scanned image.
#[utoipa::path(
    get,
    path = "/api/Document/{id}/Image",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Raw image bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn get_document_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let document = state
        .registry
        .find_document(DocumentId::from_uuid(id))
        .ok_or_else(|| document_not_found(id))?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        document.image,
    ))
}

/// PATCH /api/Document/:id: Overwrite the verified flag.
#[utoipa::path(
    patch,
    path = "/api/Document/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = PatchDocumentRequest,
    responses(
        (status = 204, description = "Document patched"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Empty patch", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn patch_document(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<PatchDocumentRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::CustomsOfficer)?;
    let req = extract_validated_json(body)?;
    if let Some(verified) = req.verified {
        state
            .workflow()
            .set_document_verified(DocumentId::from_uuid(id), verified)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/Document/:id: Remove a document from its crossing.
#[utoipa::path(
    delete,
    path = "/api/Document/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn delete_document(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::CustomsOfficer)?;
    state.workflow().delete_document(DocumentId::from_uuid(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/Document/:id/Non-compliant: Report anomalies against a document.
#[utoipa::path(
    post,
    path = "/api/Document/{id}/Non-compliant",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = Vec<String>,
    responses(
        (status = 200, description = "Anomalies recorded", body = Vec<AnomalyView>),
        (status = 404, description = "Document not found", body = crate::error::ErrorBody),
        (status = 422, description = "Empty report", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn report_anomalies(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<AnomalyReport>, JsonRejection>,
) -> Result<Json<Vec<AnomalyView>>, AppError> {
    let report = extract_json(body)?;
    let created = state
        .workflow()
        .report_anomalies(DocumentId::from_uuid(id), report.into_descriptions())?;
    Ok(Json(created.into_iter().map(AnomalyView::from).collect()))
}
