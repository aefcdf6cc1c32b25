//! # OpenAPI Document Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Border Checkpoint API",
        version = "0.1.0",
        description = "Crossing registration, document scanning and validation, anomaly administration, exit authorization, and traffic queries.",
        license(name = "BUSL-1.1")
    ),
    paths(
        // Crossings
        crate::routes::crossings::list_crossings,
        crate::routes::crossings::create_crossing,
        crate::routes::crossings::get_crossing,
        crate::routes::crossings::register_entry,
        crate::routes::crossings::attach_document,
        crate::routes::crossings::allow_exit,
        // Documents
        crate::routes::documents::get_document,
        crate::routes::documents::get_document_image,
        crate::routes::documents::patch_document,
        crate::routes::documents::delete_document,
        crate::routes::documents::report_anomalies,
        // Anomalies
        crate::routes::anomalies::list_anomalies,
        crate::routes::anomalies::get_anomaly,
        crate::routes::anomalies::delete_anomaly,
        // Persons
        crate::routes::persons::create_person,
        crate::routes::persons::match_photo,
        crate::routes::persons::person_crossings,
        crate::routes::persons::patch_person,
        // Toll offices
        crate::routes::toll_offices::list_toll_offices,
        crate::routes::toll_offices::get_toll_office,
        crate::routes::toll_offices::create_toll_office,
        // Reference queries
        crate::routes::required_documents::required_documents,
        crate::routes::traffic::crossings_between,
    ),
    components(schemas(
        // Views
        crate::views::CrossingView,
        crate::views::DocumentView,
        crate::views::AnomalyView,
        crate::views::TollOfficeView,
        crate::views::PersonView,
        crate::views::PersonMatchView,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Request DTOs
        crate::routes::crossings::CreateCrossingRequest,
        crate::routes::crossings::InlineTollOffice,
        crate::routes::documents::PatchDocumentRequest,
        crate::routes::persons::PatchPersonRequest,
        crate::routes::toll_offices::CreateTollOfficeRequest,
        crate::auth::Role,
    )),
    tags(
        (name = "crossings", description = "Crossing lifecycle"),
        (name = "documents", description = "Scanned documents and anomaly reports"),
        (name = "anomalies", description = "Anomaly administration"),
        (name = "persons", description = "Travelers and face search"),
        (name = "toll_offices", description = "Border checkpoints"),
        (name = "required_documents", description = "Entry-document requirements"),
        (name = "traffic", description = "Traffic between countries"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
