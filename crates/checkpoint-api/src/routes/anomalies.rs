//! # Anomaly Administration API
//!
//! Administrator view over every anomaly recorded against any document.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use checkpoint_core::AnomalyId;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::state::AppState;
use crate::views::AnomalyView;

/// Build the anomalies router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/DocumentAnomaly", get(list_anomalies))
        .route(
            "/api/DocumentAnomaly/:id",
            get(get_anomaly).delete(delete_anomaly),
        )
}

/// GET /api/DocumentAnomaly: List all anomalies.
#[utoipa::path(
    get,
    path = "/api/DocumentAnomaly",
    responses(
        (status = 200, description = "All anomalies", body = Vec<AnomalyView>),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorBody),
    ),
    tag = "anomalies"
)]
async fn list_anomalies(
    caller: CallerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<AnomalyView>>, AppError> {
    require_role(&caller, Role::Administrator)?;
    let anomalies = state.registry.anomalies();
    Ok(Json(anomalies.into_iter().map(AnomalyView::from).collect()))
}

/// GET /api/DocumentAnomaly/:id: Get one anomaly.
#[utoipa::path(
    get,
    path = "/api/DocumentAnomaly/{id}",
    params(("id" = Uuid, Path, description = "Anomaly ID")),
    responses(
        (status = 200, description = "Anomaly found", body = AnomalyView),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "anomalies"
)]
async fn get_anomaly(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnomalyView>, AppError> {
    require_role(&caller, Role::Administrator)?;
    state
        .registry
        .find_anomaly(AnomalyId::from_uuid(id))
        .map(|a| Json(a.into()))
        .ok_or_else(|| AppError::NotFound(format!("anomaly {id} not found")))
}

/// DELETE /api/DocumentAnomaly/:id: Delete one anomaly.
#[utoipa::path(
    delete,
    path = "/api/DocumentAnomaly/{id}",
    params(("id" = Uuid, Path, description = "Anomaly ID")),
    responses(
        (status = 204, description = "Anomaly deleted"),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "anomalies"
)]
async fn delete_anomaly(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_role(&caller, Role::Administrator)?;
    state.workflow().delete_anomaly(AnomalyId::from_uuid(id))?;
    Ok(StatusCode::NO_CONTENT)
}
