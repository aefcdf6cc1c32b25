//! # Toll Office API

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use checkpoint_core::{CountryCode, TollOfficeId};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{require_role, CallerIdentity, Role};
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;
use crate::views::TollOfficeView;

/// Create toll office request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTollOfficeRequest {
    /// ISO 3166-1 alpha-2 code, any case.
    #[schema(example = "fr")]
    pub country: String,
}

/// Build the toll offices router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/TollOffice",
            get(list_toll_offices).post(create_toll_office),
        )
        .route("/api/TollOffice/:id", get(get_toll_office))
}

/// GET /api/TollOffice: List toll offices.
#[utoipa::path(
    get,
    path = "/api/TollOffice",
    responses((status = 200, description = "All toll offices", body = Vec<TollOfficeView>)),
    tag = "toll_offices"
)]
async fn list_toll_offices(State(state): State<AppState>) -> Json<Vec<TollOfficeView>> {
    let mut offices: Vec<TollOfficeView> = state
        .registry
        .toll_offices
        .list()
        .into_iter()
        .map(TollOfficeView::from)
        .collect();
    offices.sort_by(|a, b| a.country.cmp(&b.country).then(a.id.cmp(&b.id)));
    Json(offices)
}

/// GET /api/TollOffice/:id: Get one toll office.
#[utoipa::path(
    get,
    path = "/api/TollOffice/{id}",
    params(("id" = Uuid, Path, description = "Toll office ID")),
    responses(
        (status = 200, description = "Toll office found", body = TollOfficeView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "toll_offices"
)]
async fn get_toll_office(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TollOfficeView>, AppError> {
    state
        .registry
        .toll_offices
        .get(&TollOfficeId::from_uuid(id))
        .map(|t| Json(t.into()))
        .ok_or_else(|| AppError::NotFound(format!("toll office {id} not found")))
}

/// POST /api/TollOffice: Create a toll office.
#[utoipa::path(
    post,
    path = "/api/TollOffice",
    request_body = CreateTollOfficeRequest,
    responses(
        (status = 201, description = "Toll office created", body = TollOfficeView),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorBody),
        (status = 422, description = "Malformed country code", body = crate::error::ErrorBody),
    ),
    tag = "toll_offices"
)]
async fn create_toll_office(
    caller: CallerIdentity,
    State(state): State<AppState>,
    body: Result<Json<CreateTollOfficeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TollOfficeView>), AppError> {
    require_role(&caller, Role::Administrator)?;
    let req = extract_json(body)?;
    let country = CountryCode::new(&req.country)?;
    let toll = state.registry.add_toll_office(country);
    Ok((StatusCode::CREATED, Json(toll.into())))
}
