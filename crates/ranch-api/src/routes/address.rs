//! # Address API
//!
//! `GET /address` describes the fields of a fresh address. `POST /address`
//! takes an unordered JSON object of field keys to values, applies it in the
//! target locale's significance order, and returns the resulting schema.
//! The first rejected field ends the request with a 400.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use indexmap::IndexMap;
use ranch_address::{export, submit, Address, AddressPart, SchemaExport};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// One option of a choice field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChoiceDoc {
    pub key: String,
    pub name: String,
}

/// Description of one field as returned by the address endpoints.
///
/// Mirrors the serialized form of [`ranch_address::FieldDescriptor`].
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct FieldDoc {
    pub label: String,
    /// `text`, `choice`, or `pattern`.
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    pub choices: Option<Vec<ChoiceDoc>>,
    pub pattern: Option<String>,
    pub example: Option<String>,
    pub max_length: Option<usize>,
    pub postal_prefix: Option<String>,
    /// The assigned value, if any.
    pub value: Option<String>,
}

/// Field key to description. The served JSON object lists keys in the
/// locale's significance order; this document type only describes its shape.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddressSchemaDoc(pub HashMap<String, FieldDoc>);

/// Field key to submitted value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionDoc(pub HashMap<String, String>);

/// Build the address router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/address", get(get_address).post(post_address))
        .route("/address/{country}", get(get_address_for_country))
}

/// GET /address: Field schema of an empty address.
#[utoipa::path(
    get,
    path = "/address",
    responses(
        (status = 200, description = "Default locale field schema", body = AddressSchemaDoc),
    ),
    tag = "address"
)]
pub(crate) async fn get_address(State(state): State<AppState>) -> Json<SchemaExport> {
    let address = Address::with_rules(Arc::clone(&state.rules));
    Json(export(&address))
}

/// GET /address/{country}: Field schema with the country preset.
#[utoipa::path(
    get,
    path = "/address/{country}",
    params(("country" = String, Path, description = "ISO 3166-1 alpha-2 country code")),
    responses(
        (status = 200, description = "Locale field schema", body = AddressSchemaDoc),
        (status = 400, description = "Not a country code", body = crate::error::ErrorBody),
    ),
    tag = "address"
)]
pub(crate) async fn get_address_for_country(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<SchemaExport>, AppError> {
    let mut address = Address::with_rules(Arc::clone(&state.rules));
    address.set_field(AddressPart::Country, &country)?;
    Ok(Json(export(&address)))
}

/// POST /address: Validate a submission and return the resulting schema.
#[utoipa::path(
    post,
    path = "/address",
    request_body = SubmissionDoc,
    responses(
        (status = 200, description = "Submission accepted", body = AddressSchemaDoc),
        (status = 400, description = "Malformed body, unknown field, or invalid value", body = crate::error::ErrorBody),
    ),
    tag = "address"
)]
pub(crate) async fn post_address(
    State(state): State<AppState>,
    body: Result<Json<IndexMap<String, String>>, JsonRejection>,
) -> Result<Json<SchemaExport>, AppError> {
    let pairs = extract_json(body)?;
    let mut address = Address::with_rules(Arc::clone(&state.rules));

    let outcome = submit(&mut address, pairs);
    let label = if outcome.is_ok() { "accepted" } else { "rejected" };
    metrics::counter!("ranch_submissions_total", "outcome" => label).increment(1);
    outcome?;

    tracing::info!(locale = address.locale().key(), "address accepted");
    Ok(Json(export(&address)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_doc_accepts_every_exported_field() {
        let mut address = Address::new();
        address.set_field(AddressPart::Country, "US").unwrap();
        address.set_field(AddressPart::AdministrativeArea, "CO").unwrap();
        address.set_field(AddressPart::PostalCode, "80202").unwrap();
        let json = serde_json::to_value(export(&address)).unwrap();

        let doc: AddressSchemaDoc = serde_json::from_value(json).unwrap();
        let area = &doc.0["administrative_area"];
        assert_eq!(area.kind, "choice");
        assert!(area.choices.as_ref().is_some_and(|c| c.iter().any(|c| c.key == "CO")));
        let zip = &doc.0["postal_code"];
        assert_eq!(zip.kind, "pattern");
        assert_eq!(zip.postal_prefix.as_deref(), Some("8[01]"));
        assert_eq!(zip.value.as_deref(), Some("80202"));
        assert!(zip.example.is_some() && zip.pattern.is_some());
        assert_eq!(doc.0["street_address"].max_length, Some(200));
    }

    #[test]
    fn field_doc_rejects_undocumented_fields() {
        let json = serde_json::json!({
            "label": "City",
            "type": "text",
            "required": true,
            "format": "upper"
        });
        assert!(serde_json::from_value::<FieldDoc>(json).is_err());
    }
}
