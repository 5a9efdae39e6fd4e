//! Rule-table error types.
//!
//! Raised only while loading rule data. Once a [`crate::RuleTable`] exists
//! every lookup on it is infallible.

use std::path::PathBuf;

use ranch_core::AddressPart;
use thiserror::Error;

/// Errors that can occur while building a rule table.
#[derive(Debug, Error)]
pub enum RuleTableError {
    /// YAML parsing failed.
    #[error("failed to parse locale rules: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// A rule file was not found.
    #[error("locale rule file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table has no `ZZ` entry.
    #[error("locale rules define no default locale (ZZ)")]
    MissingDefault,

    /// The same locale key appears twice.
    #[error("locale {locale} is defined more than once")]
    DuplicateLocale { locale: String },

    /// A locale key is not two ASCII letters.
    #[error("invalid locale key {locale:?} (expected two ASCII letters)")]
    InvalidLocaleKey { locale: String },

    /// The field list does not start with `country`.
    #[error("locale {locale}: field list must start with country")]
    CountryNotFirst { locale: String },

    /// A field is listed twice.
    #[error("locale {locale}: field {field} is listed more than once")]
    DuplicateField { locale: String, field: AddressPart },

    /// Required/label/constraint entry for a field the locale does not list.
    #[error("locale {locale}: {section} entry for unlisted field {field}")]
    UnlistedField {
        locale: String,
        section: &'static str,
        field: AddressPart,
    },

    /// A constraint is malformed.
    #[error("locale {locale}: invalid constraint for {field}: {detail}")]
    InvalidConstraint {
        locale: String,
        field: AddressPart,
        detail: String,
    },

    /// A regular expression does not compile.
    #[error("locale {locale}: invalid pattern for {field}: {source}")]
    InvalidPattern {
        locale: String,
        field: AddressPart,
        source: regex::Error,
    },
}

/// Convenience alias.
pub type RuleTableResult<T> = Result<T, RuleTableError>;
