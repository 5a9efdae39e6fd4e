//! # Schema Export
//!
//! Serializable description of the fields an address currently accepts.
//! The export is what clients render a form from: one entry per significant
//! field of the current locale, in significance order, with its label,
//! value kind, constraint details, and assigned value.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use ranch_core::{AddressPart, ValueKind};
use ranch_locale::{Constraint, LocaleRule};
use serde::Serialize;

use crate::address::Address;

/// One option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub key: String,
    pub name: String,
}

/// Type and constraint details of one field under one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldType {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Prefix postal codes must start with, given the assigned
    /// administrative area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_prefix: Option<String>,
}

impl FieldType {
    /// Describe `part` under `rule`, given the assigned fields.
    pub fn describe(
        rule: &LocaleRule,
        part: AddressPart,
        assigned: &BTreeMap<AddressPart, String>,
    ) -> Self {
        let constraint = rule.constraint(part);
        let max_length = match constraint {
            Constraint::Text { max_length } => *max_length,
            _ => None,
        };
        let postal_prefix = if part == AddressPart::PostalCode {
            assigned
                .get(&AddressPart::AdministrativeArea)
                .and_then(|area| rule.postal_prefix_for(area))
                .map(|prefix| prefix.as_str().to_string())
        } else {
            None
        };

        Self {
            label: rule.label(part).to_string(),
            kind: constraint.kind(),
            required: rule.is_required(part),
            choices: constraint
                .choices()
                .iter()
                .map(|c| ChoiceOption {
                    key: c.key.clone(),
                    name: c.name.clone(),
                })
                .collect(),
            pattern: constraint.pattern_source().map(str::to_string),
            example: constraint.example().map(str::to_string),
            max_length,
            postal_prefix,
        }
    }
}

/// A [`FieldType`] plus the value currently assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Ordered map from field key to descriptor. Serializes as a JSON object
/// whose keys follow the locale's significance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaExport(IndexMap<String, FieldDescriptor>);

impl SchemaExport {
    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.0.get(key)
    }

    /// Field keys in significance order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Export the current field set of `address` with assigned values.
pub fn export(address: &Address) -> SchemaExport {
    let fields = address
        .get_field_types()
        .into_iter()
        .map(|(part, field_type)| {
            let descriptor = FieldDescriptor {
                field_type,
                value: address.get(part).map(str::to_string),
            };
            (part.as_str().to_string(), descriptor)
        })
        .collect();
    SchemaExport(fields)
}
