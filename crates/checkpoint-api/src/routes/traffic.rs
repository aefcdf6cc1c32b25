//! # Traffic API
//!
//! Road crossings between two countries within a time window.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use checkpoint_state::TrafficQuery;
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::routes::crossings::parse_optional_time;
use crate::state::AppState;
use crate::views::CrossingView;

/// Traffic query. The window defaults to the last minute.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrafficParams {
    /// Country of the entry toll.
    pub from: Option<String>,
    /// Country of the exit toll.
    pub to: Option<String>,
    /// Window start. Required when `end` is given.
    pub start: Option<String>,
    /// Window end. Not before `start`.
    pub end: Option<String>,
}

/// Build the traffic router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/Pass", get(crossings_between))
}

/// GET /api/Pass: Road crossings from one country to another.
#[utoipa::path(
    get,
    path = "/api/Pass",
    params(TrafficParams),
    responses(
        (status = 200, description = "Matching crossings", body = Vec<CrossingView>),
        (status = 422, description = "Invalid query", body = crate::error::ErrorBody),
    ),
    tag = "traffic"
)]
async fn crossings_between(
    State(state): State<AppState>,
    params: Result<Query<TrafficParams>, QueryRejection>,
) -> Result<Json<Vec<CrossingView>>, AppError> {
    let params = extract_query(params)?;
    let query = TrafficQuery::new(
        params.from.as_deref(),
        params.to.as_deref(),
        parse_optional_time(params.start.as_deref())?,
        parse_optional_time(params.end.as_deref())?,
    )?;
    let crossings = state.registry.crossings_between(&query, Utc::now());
    Ok(Json(crossings.into_iter().map(CrossingView::from).collect()))
}
