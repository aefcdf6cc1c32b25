//! # Person API
//!
//! Traveler registration from a reference photo, face search, a person's
//! crossing history, and relinking crossings to a person.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use checkpoint_core::{CrossingId, PersonId};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, read_file_field, Validate};
use crate::state::AppState;
use crate::views::{CrossingView, PersonMatchView, PersonView};

/// Generic person patch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PatchPersonRequest {
    /// Replaces the crossings linked to the person.
    pub crossing_ids: Option<Vec<Uuid>>,
}

impl Validate for PatchPersonRequest {
    fn validate(&self) -> Result<(), String> {
        if self.crossing_ids.is_none() {
            return Err("patch must set at least one field".to_string());
        }
        Ok(())
    }
}

/// Build the persons router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/Person", post(create_person))
        .route("/api/Person/GetPhoto", post(match_photo))
        .route(
            "/api/Person/:id",
            get(person_crossings).patch(patch_person),
        )
}

/// POST /api/Person: Register a traveler from a reference photo.
#[utoipa::path(
    post,
    path = "/api/Person",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Photo in field `file`"),
    responses(
        (status = 201, description = "Person created", body = PersonView),
        (status = 400, description = "Missing photo", body = crate::error::ErrorBody),
    ),
    tag = "persons"
)]
async fn create_person(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<PersonView>), AppError> {
    let photo = read_file_field(multipart).await?;
    let person = state.registry.add_person(photo);
    Ok((StatusCode::CREATED, Json(person.into())))
}

/// POST /api/Person/GetPhoto: Find the traveler matching a photo.
#[utoipa::path(
    post,
    path = "/api/Person/GetPhoto",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Photo in field `file`"),
    responses(
        (status = 200, description = "Best match above threshold", body = PersonMatchView),
        (status = 404, description = "No match", body = crate::error::ErrorBody),
    ),
    tag = "persons"
)]
async fn match_photo(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PersonMatchView>, AppError> {
    let photo = read_file_field(multipart).await?;
    let (person_id, score) = state
        .registry
        .match_person(state.face_matcher.as_ref(), &photo)
        .ok_or_else(|| AppError::NotFound("no person matches the photo".into()))?;
    tracing::info!(person_id = %person_id, score, "face match found");
    Ok(Json(PersonMatchView {
        person_id: *person_id.as_uuid(),
        score,
    }))
}

/// GET /api/Person/:id: Crossings associated with a traveler.
#[utoipa::path(
    get,
    path = "/api/Person/{id}",
    params(("id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 200, description = "The person's crossings", body = Vec<CrossingView>),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "persons"
)]
async fn person_crossings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CrossingView>>, AppError> {
    let crossings = state
        .registry
        .person_crossings(PersonId::from_uuid(id))
        .ok_or_else(|| AppError::NotFound(format!("person {id} not found")))?;
    Ok(Json(crossings.into_iter().map(CrossingView::from).collect()))
}

/// PATCH /api/Person/:id: Replace the crossings linked to a traveler.
#[utoipa::path(
    patch,
    path = "/api/Person/{id}",
    params(("id" = Uuid, Path, description = "Person ID")),
    request_body = PatchPersonRequest,
    responses(
        (status = 204, description = "Person patched"),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Empty patch, or unknown or foreign crossing", body = crate::error::ErrorBody),
    ),
    tag = "persons"
)]
async fn patch_person(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<PatchPersonRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::CustomsOfficer)?;
    let req = extract_validated_json(body)?;
    if let Some(crossing_ids) = req.crossing_ids {
        state.workflow().relink_person(
            PersonId::from_uuid(id),
            crossing_ids.into_iter().map(CrossingId::from_uuid).collect(),
        )?;
    }
    Ok(StatusCode::NO_CONTENT)
}
