//! # Field Catalog: Single Source of Truth
//!
//! Defines the `AddressPart` enum, the closed set of address field
//! identities, and the constant catalog describing each one. This is the ONE
//! definition used by the rule tables, the validator, the schema exporter,
//! and the wire layer.
//!
//! | # | Key | Default label | Default kind |
//! |---|-----|---------------|--------------|
//! | 1 | `country` | Country | pattern |
//! | 2 | `administrative_area` | Administrative area | text |
//! | 3 | `locality` | City | text |
//! | 4 | `dependent_locality` | District | text |
//! | 5 | `sorting_code` | Sorting code | text |
//! | 6 | `postal_code` | Postal code | pattern |
//! | 7 | `street_address` | Street address | text |
//! | 8 | `organization` | Organization | text |
//! | 9 | `recipient` | Recipient | text |
//!
//! Locales override labels and kinds; the identities themselves never
//! change at runtime.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AddressError;
use crate::kind::ValueKind;

/// Every recognized address field.
///
/// Variant order is catalog order, which is also the fixed fallback order
/// used when a submission carries fields outside a locale's significant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressPart {
    /// ISO 3166-1 alpha-2 country code. Selects the locale rules.
    Country,
    /// State, province, prefecture, or similar first-level division.
    AdministrativeArea,
    /// City or post town.
    Locality,
    /// District or neighbourhood within a locality.
    DependentLocality,
    /// Sorting code (e.g. French CEDEX).
    SortingCode,
    /// Postal or ZIP code.
    PostalCode,
    /// Street lines.
    StreetAddress,
    /// Company or organization name.
    Organization,
    /// Name of the addressee.
    Recipient,
}

/// Total number of address parts.
pub const ADDRESS_PART_COUNT: usize = 9;

/// Static description of one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub part: AddressPart,
    /// Canonical wire key.
    pub key: &'static str,
    /// Label used when a locale does not override it.
    pub label: &'static str,
    /// Kind used when a locale does not constrain the field.
    pub kind: ValueKind,
}

const ENTRIES: [FieldSpec; ADDRESS_PART_COUNT] = [
    FieldSpec {
        part: AddressPart::Country,
        key: "country",
        label: "Country",
        kind: ValueKind::Pattern,
    },
    FieldSpec {
        part: AddressPart::AdministrativeArea,
        key: "administrative_area",
        label: "Administrative area",
        kind: ValueKind::Text,
    },
    FieldSpec {
        part: AddressPart::Locality,
        key: "locality",
        label: "City",
        kind: ValueKind::Text,
    },
    FieldSpec {
        part: AddressPart::DependentLocality,
        key: "dependent_locality",
        label: "District",
        kind: ValueKind::Text,
    },
    FieldSpec {
        part: AddressPart::SortingCode,
        key: "sorting_code",
        label: "Sorting code",
        kind: ValueKind::Text,
    },
    FieldSpec {
        part: AddressPart::PostalCode,
        key: "postal_code",
        label: "Postal code",
        kind: ValueKind::Pattern,
    },
    FieldSpec {
        part: AddressPart::StreetAddress,
        key: "street_address",
        label: "Street address",
        kind: ValueKind::Text,
    },
    FieldSpec {
        part: AddressPart::Organization,
        key: "organization",
        label: "Organization",
        kind: ValueKind::Text,
    },
    FieldSpec {
        part: AddressPart::Recipient,
        key: "recipient",
        label: "Recipient",
        kind: ValueKind::Text,
    },
];

static CATALOG: [FieldSpec; ADDRESS_PART_COUNT] = ENTRIES;

static PARTS: [AddressPart; ADDRESS_PART_COUNT] = parts_of(&ENTRIES);

const fn parts_of(entries: &[FieldSpec; ADDRESS_PART_COUNT]) -> [AddressPart; ADDRESS_PART_COUNT] {
    let mut parts = [AddressPart::Country; ADDRESS_PART_COUNT];
    let mut i = 0;
    while i < ADDRESS_PART_COUNT {
        parts[i] = entries[i].part;
        i += 1;
    }
    parts
}

impl AddressPart {
    /// Returns every address part in catalog order.
    pub fn all() -> &'static [AddressPart] {
        &PARTS
    }

    /// Position of this part in the catalog. Catalog entries are listed in
    /// variant declaration order.
    pub fn catalog_index(&self) -> usize {
        *self as usize
    }

    /// The catalog entry for this part.
    pub fn spec(&self) -> &'static FieldSpec {
        &CATALOG[self.catalog_index()]
    }

    /// Canonical wire key. Matches the serde representation.
    pub fn as_str(&self) -> &'static str {
        self.spec().key
    }

    /// Default human label.
    pub fn label(&self) -> &'static str {
        self.spec().label
    }

    /// Default value kind.
    pub fn default_kind(&self) -> ValueKind {
        self.spec().kind
    }

    /// Resolve a wire key to its address part.
    ///
    /// Keys are case-sensitive, exactly as produced by [`AddressPart::as_str`].
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::UnrecognizedField`] for any other string.
    pub fn from_key(key: &str) -> Result<Self, AddressError> {
        CATALOG
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.part)
            .ok_or_else(|| AddressError::UnrecognizedField {
                key: key.to_string(),
                locale: None,
            })
    }
}

impl std::fmt::Display for AddressPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressPart {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_parts_count() {
        assert_eq!(AddressPart::all().len(), ADDRESS_PART_COUNT);
    }

    #[test]
    fn test_all_parts_unique() {
        let mut seen = std::collections::HashSet::new();
        for part in AddressPart::all() {
            assert!(seen.insert(part), "Duplicate part: {part}");
        }
    }

    #[test]
    fn test_catalog_index_matches_table() {
        for (i, part) in AddressPart::all().iter().enumerate() {
            assert_eq!(part.catalog_index(), i);
            assert_eq!(part.spec().part, *part);
        }
        assert!(AddressPart::all().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_key_lookup() {
        for part in AddressPart::all() {
            assert_eq!(AddressPart::from_key(part.as_str()).unwrap(), *part);
        }
        assert_eq!(
            "postal_code".parse::<AddressPart>().unwrap(),
            AddressPart::PostalCode
        );
    }

    #[test]
    fn test_from_key_unknown() {
        let err = AddressPart::from_key("zzzz").unwrap_err();
        assert_eq!(
            err,
            AddressError::UnrecognizedField {
                key: "zzzz".to_string(),
                locale: None
            }
        );
        assert!(AddressPart::from_key("Country").is_err()); // case-sensitive
        assert!(AddressPart::from_key("").is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for part in AddressPart::all() {
            let json = serde_json::to_string(part).unwrap();
            assert_eq!(json, format!("\"{}\"", part.as_str()));
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AddressPart::Country.default_kind(), ValueKind::Pattern);
        assert_eq!(AddressPart::Recipient.default_kind(), ValueKind::Text);
        assert_eq!(AddressPart::Locality.label(), "City");
    }
}
