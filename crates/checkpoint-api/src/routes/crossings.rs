//! # Crossing API
//!
//! Crossing creation and listing, entry registration, document upload, and
//! exit authorization.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use checkpoint_core::{
    parse_utc, CountryCode, CrossingId, PassengerKind, PassengerType, PersonId, TollOfficeId,
    Transport,
};
use checkpoint_state::{CrossingFilter, EntryToll, NewCrossing};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::{extract_query, extract_validated_json, read_file_field, Validate};
use crate::state::AppState;
use crate::views::{CrossingView, DocumentView};

/// Inline entry toll, created alongside the crossing.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InlineTollOffice {
    #[schema(example = "fr")]
    pub country: String,
}

/// Create crossing request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCrossingRequest {
    pub passenger_count: u32,
    #[serde(default)]
    #[schema(value_type = String, example = "car")]
    pub transport: Transport,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub passenger_type: PassengerType,
    /// Existing entry toll.
    pub entry_toll_id: Option<Uuid>,
    /// New entry toll. Mutually exclusive with `entry_toll_id`.
    pub entry_toll: Option<InlineTollOffice>,
    /// Entry time (RFC 3339 or naive UTC). Defaults to now; ignored without
    /// an entry toll.
    pub entry_time: Option<String>,
    pub person_id: Option<Uuid>,
}

impl Validate for CreateCrossingRequest {
    fn validate(&self) -> Result<(), String> {
        if self.entry_toll_id.is_some() && self.entry_toll.is_some() {
            return Err("entry_toll_id and entry_toll are mutually exclusive".to_string());
        }
        Ok(())
    }
}

/// Listing filters. All optional and combined with AND.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListCrossingsParams {
    /// Only crossings with an authorized exit (default true).
    pub validated_only: Option<bool>,
    /// Inclusive lower bound on entry time.
    pub start_date: Option<String>,
    /// Inclusive upper bound on entry time.
    pub end_date: Option<String>,
    /// `human` or `merchandise`.
    pub passenger_type: Option<String>,
    /// Entry or exit toll.
    pub toll_id: Option<Uuid>,
    pub passenger_count_min: Option<u32>,
    pub passenger_count_max: Option<u32>,
}

impl ListCrossingsParams {
    fn into_filter(self) -> Result<CrossingFilter, AppError> {
        let passenger_kind = match self.passenger_type.as_deref() {
            None => None,
            Some("human") => Some(PassengerKind::Human),
            Some("merchandise") => Some(PassengerKind::Merchandise),
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "unknown passengerType \"{other}\", expected human or merchandise"
                )))
            }
        };
        Ok(CrossingFilter {
            validated_only: self.validated_only.unwrap_or(true),
            entry_time_from: parse_optional_time(self.start_date.as_deref())?,
            entry_time_to: parse_optional_time(self.end_date.as_deref())?,
            passenger_kind,
            toll_id: self.toll_id.map(TollOfficeId::from_uuid),
            passenger_count_min: self.passenger_count_min,
            passenger_count_max: self.passenger_count_max,
        })
    }
}

/// Entry registration parameters.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RegisterEntryParams {
    pub toll_id: Uuid,
    /// Entry time. Defaults to now.
    pub time: Option<String>,
}

/// Exit authorization parameters.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AllowExitParams {
    pub id: Uuid,
    pub toll_id: Uuid,
}

pub(crate) fn parse_optional_time(value: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_utc(v.trim()))
        .transpose()
        .map_err(AppError::from)
}

/// Body of the exit request: a JSON string timestamp, `null`, or nothing.
fn parse_exit_time(body: &[u8]) -> Result<Option<DateTime<Utc>>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let time: Option<String> = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("exit time must be a JSON string: {e}")))?;
    parse_optional_time(time.as_deref())
}

/// Build the crossings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/CrossingInfo",
            get(list_crossings).post(create_crossing).patch(allow_exit),
        )
        .route("/api/CrossingInfo/:id", get(get_crossing))
        .route("/api/CrossingInfo/:id/EntryToll", patch(register_entry))
        .route("/api/CrossingInfo/:id/Document", post(attach_document))
}

/// GET /api/CrossingInfo: List registered crossings.
#[utoipa::path(
    get,
    path = "/api/CrossingInfo",
    params(ListCrossingsParams),
    responses(
        (status = 200, description = "Matching crossings", body = Vec<CrossingView>),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Not a customs officer", body = crate::error::ErrorBody),
    ),
    tag = "crossings"
)]
async fn list_crossings(
    caller: CallerIdentity,
    State(state): State<AppState>,
    params: Result<Query<ListCrossingsParams>, QueryRejection>,
) -> Result<Json<Vec<CrossingView>>, AppError> {
    require_role(&caller, Role::CustomsOfficer)?;
    let filter = extract_query(params)?.into_filter()?;
    let crossings = state.registry.list_crossings(&filter);
    Ok(Json(crossings.into_iter().map(CrossingView::from).collect()))
}

/// POST /api/CrossingInfo: Create a crossing.
#[utoipa::path(
    post,
    path = "/api/CrossingInfo",
    request_body = CreateCrossingRequest,
    responses(
        (status = 201, description = "Crossing created", body = CrossingView),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 404, description = "Toll office or person not found", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "crossings"
)]
async fn create_crossing(
    caller: CallerIdentity,
    State(state): State<AppState>,
    body: Result<Json<CreateCrossingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CrossingView>), AppError> {
    require_role(&caller, Role::CustomsOfficer)?;
    let req = extract_validated_json(body)?;
    let entry_toll = match (req.entry_toll_id, req.entry_toll) {
        (Some(id), _) => Some(EntryToll::Existing(TollOfficeId::from_uuid(id))),
        (None, Some(inline)) => Some(EntryToll::New(CountryCode::new(&inline.country)?)),
        (None, None) => None,
    };
    let record = state.workflow().create(NewCrossing {
        passenger_count: req.passenger_count,
        transport: req.transport,
        passenger_type: req.passenger_type,
        entry_toll,
        entry_time: parse_optional_time(req.entry_time.as_deref())?,
        person_id: req.person_id.map(PersonId::from_uuid),
    })?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /api/CrossingInfo/:id: Get one crossing.
#[utoipa::path(
    get,
    path = "/api/CrossingInfo/{id}",
    params(("id" = Uuid, Path, description = "Crossing ID")),
    responses(
        (status = 200, description = "Crossing found", body = CrossingView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "crossings"
)]
async fn get_crossing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CrossingView>, AppError> {
    let record = state.workflow().crossing(CrossingId::from_uuid(id))?;
    Ok(Json(record.into()))
}

/// PATCH /api/CrossingInfo/:id/EntryToll: Register entry and validate documents.
#[utoipa::path(
    patch,
    path = "/api/CrossingInfo/{id}/EntryToll",
    params(("id" = Uuid, Path, description = "Crossing ID"), RegisterEntryParams),
    responses(
        (status = 204, description = "Entry registered"),
        (status = 404, description = "Crossing or toll office not found", body = crate::error::ErrorBody),
        (status = 409, description = "Already registered", body = crate::error::ErrorBody),
    ),
    tag = "crossings"
)]
async fn register_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    params: Result<Query<RegisterEntryParams>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let params = extract_query(params)?;
    let time = parse_optional_time(params.time.as_deref())?;
    state.workflow().register_entry(
        CrossingId::from_uuid(id),
        TollOfficeId::from_uuid(params.toll_id),
        time,
    )?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/CrossingInfo/:id/Document: Upload a scanned document.
#[utoipa::path(
    post,
    path = "/api/CrossingInfo/{id}/Document",
    params(("id" = Uuid, Path, description = "Crossing ID")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Image in field `file`"),
    responses(
        (status = 201, description = "Document attached", body = DocumentView),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 404, description = "Crossing not found", body = crate::error::ErrorBody),
    ),
    tag = "crossings"
)]
async fn attach_document(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<DocumentView>), AppError> {
    require_role(&caller, Role::CustomsOfficer)?;
    let image = read_file_field(multipart).await?;
    let document = state
        .workflow()
        .attach_document(CrossingId::from_uuid(id), image)?;
    Ok((StatusCode::CREATED, Json(document.into())))
}

/// PATCH /api/CrossingInfo: Authorize exit. Body is the exit time as a JSON string.
#[utoipa::path(
    patch,
    path = "/api/CrossingInfo",
    params(AllowExitParams),
    request_body(content = String, description = "Exit time as a JSON string; empty body means now"),
    responses(
        (status = 204, description = "Exit authorized"),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Documents not cleared, or not a customs officer", body = crate::error::ErrorBody),
        (status = 404, description = "Crossing or toll office not found", body = crate::error::ErrorBody),
        (status = 409, description = "Already exited", body = crate::error::ErrorBody),
        (status = 422, description = "Entry not registered", body = crate::error::ErrorBody),
    ),
    tag = "crossings"
)]
async fn allow_exit(
    caller: CallerIdentity,
    State(state): State<AppState>,
    params: Result<Query<AllowExitParams>, QueryRejection>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::CustomsOfficer)?;
    let params = extract_query(params)?;
    let time = parse_exit_time(&body)?;
    state.workflow().allow_exit(
        CrossingId::from_uuid(params.id),
        TollOfficeId::from_uuid(params.toll_id),
        time,
    )?;
    Ok(StatusCode::NO_CONTENT)
}
