//! # Required Documents API
//!
//! Which documents a traveler needs, given nationality, origin and
//! destination.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use checkpoint_core::CountryCode;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::AppState;

/// Required-document query. Each value is an ISO 3166-1 alpha-2 code.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequiredDocumentParams {
    pub nationality: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl RequiredDocumentParams {
    /// Validate the three codes in nationality, origin, destination order.
    fn countries(&self) -> Result<Vec<CountryCode>, AppError> {
        [
            ("nationality", &self.nationality),
            ("origin", &self.origin),
            ("destination", &self.destination),
        ]
        .into_iter()
        .map(|(name, value)| -> Result<CountryCode, AppError> {
            let value = value
                .as_deref()
                .ok_or_else(|| AppError::Validation(format!("`{name}` is required")))?;
            Ok(CountryCode::assigned(value)?)
        })
        .collect()
    }
}

/// Build the required documents router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/RequiredDocument", get(required_documents))
}

/// GET /api/RequiredDocument: Links to the documents a traveler needs.
#[utoipa::path(
    get,
    path = "/api/RequiredDocument",
    params(RequiredDocumentParams),
    responses(
        (status = 200, description = "Required-document links", body = Vec<String>),
        (status = 422, description = "Missing or invalid country code", body = crate::error::ErrorBody),
    ),
    tag = "required_documents"
)]
async fn required_documents(
    State(state): State<AppState>,
    params: Result<Query<RequiredDocumentParams>, QueryRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let countries = extract_query(params)?.countries()?;
    Ok(Json(state.registry.required_links(&countries)))
}
