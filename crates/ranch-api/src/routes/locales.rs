//! # Locales API
//!
//! Lists the locales of the loaded rule table, default first.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// A locale the rule table defines.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocaleSummary {
    pub key: String,
    pub name: String,
    /// Significant fields in evaluation order.
    pub fields: Vec<String>,
    pub required: Vec<String>,
}

/// Build the locales router.
pub fn router() -> Router<AppState> {
    Router::new().route("/locales", get(list_locales))
}

/// GET /locales: Every locale, default first.
#[utoipa::path(
    get,
    path = "/locales",
    responses(
        (status = 200, description = "Known locales", body = Vec<LocaleSummary>),
    ),
    tag = "locales"
)]
pub(crate) async fn list_locales(State(state): State<AppState>) -> Json<Vec<LocaleSummary>> {
    let keys = |parts: &[ranch_address::AddressPart]| {
        parts.iter().map(|p| p.as_str().to_string()).collect::<Vec<_>>()
    };
    let locales = state
        .rules
        .locales()
        .map(|rule| LocaleSummary {
            key: rule.key().to_string(),
            name: rule.name().to_string(),
            fields: keys(rule.significant_fields()),
            required: keys(rule.required_fields()),
        })
        .collect();
    Json(locales)
}
