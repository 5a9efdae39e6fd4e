//! # Error Hierarchy
//!
//! Structured error types for address validation, built with `thiserror`.
//!
//! Every rejection is an expected outcome of bad input. Errors carry the
//! offending field so the wire layer can report it, and a message a human
//! can act on without reading the rule data.

use thiserror::Error;

use crate::catalog::AddressPart;

/// A field value failed its constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    /// The field that was rejected.
    pub field: AddressPart,
    /// Why it was rejected.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: AddressPart, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Top-level error returned by address operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The key is not a known address field, or the field is not used by
    /// the locale the address currently resolves to.
    #[error("{}", unrecognized_message(.key, .locale.as_deref()))]
    UnrecognizedField {
        /// The key as submitted.
        key: String,
        /// Locale that does not use the field; `None` for unknown keys.
        locale: Option<String>,
    },

    /// A value failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

fn unrecognized_message(key: &str, locale: Option<&str>) -> String {
    match locale {
        Some(locale) => format!("field {key:?} is not used in locale {locale}"),
        None => format!("unrecognized field {key:?}"),
    }
}

impl AddressError {
    /// The field this error concerns, when it maps to a known part.
    pub fn field(&self) -> Option<AddressPart> {
        match self {
            Self::UnrecognizedField { key, .. } => AddressPart::from_key(key).ok(),
            Self::Invalid(err) => Some(err.field),
        }
    }

    /// The rejection reason without the field prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::UnrecognizedField {
                locale: Some(locale),
                ..
            } => format!("not used in locale {locale}"),
            Self::UnrecognizedField { locale: None, .. } => "unrecognized field".to_string(),
            Self::Invalid(err) => err.message.clone(),
        }
    }
}
