//! # OpenAPI Document Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ranch Address API",
        version = "0.1.0",
        description = "Locale-driven postal address validation: field schemas per country and ordered address submission.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::address::get_address,
        crate::routes::address::get_address_for_country,
        crate::routes::address::post_address,
        crate::routes::locales::list_locales,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::address::ChoiceDoc,
        crate::routes::address::FieldDoc,
        crate::routes::address::AddressSchemaDoc,
        crate::routes::address::SubmissionDoc,
        crate::routes::locales::LocaleSummary,
    )),
    tags(
        (name = "address", description = "Address schema and submission"),
        (name = "locales", description = "Locale rule table"),
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
