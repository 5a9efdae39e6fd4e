//! # Field Validator
//!
//! Pure functions deciding whether a value is acceptable for a field under a
//! locale rule. Checks run in a fixed order and the first failure wins:
//!
//! 1. the field is significant for the locale,
//! 2. the value is non-empty if the field is mandatory,
//! 3. the value satisfies the field's constraint,
//! 4. (in context) the value agrees with the fields it depends on.
//!
//! On success the canonical value to store is returned: trimmed, country
//! codes upper-cased, choices resolved to their key. `Ok(None)` means an
//! optional field was given an empty value and should be cleared.

use std::collections::BTreeMap;

use ranch_core::{AddressError, AddressPart, ValidationError};

use crate::rule::{Constraint, LocaleRule};

/// Validate `value` for `part` under `rule`, without looking at other fields.
pub fn validate(
    rule: &LocaleRule,
    part: AddressPart,
    value: &str,
) -> Result<Option<String>, AddressError> {
    if !rule.is_significant(part) {
        return Err(AddressError::UnrecognizedField {
            key: part.as_str().to_string(),
            locale: Some(rule.key().to_string()),
        });
    }

    let value = value.trim();
    if value.is_empty() {
        if rule.is_required(part) {
            return Err(ValidationError::new(
                part,
                format!("{} is required in {}", rule.label(part), rule.name()),
            )
            .into());
        }
        return Ok(None);
    }

    let canonical = match rule.constraint(part) {
        Constraint::Text { max_length } => {
            if let Some(max) = max_length {
                if value.chars().count() > *max {
                    return Err(ValidationError::new(
                        part,
                        format!("{} must be at most {max} characters", rule.label(part)),
                    )
                    .into());
                }
            }
            value.to_string()
        }
        Constraint::Choice(choices) => match choices.iter().find(|c| c.matches(value)) {
            Some(choice) => choice.key.clone(),
            None => {
                return Err(ValidationError::new(
                    part,
                    format!("{value:?} is not a recognized {} in {}", rule.label(part), rule.name()),
                )
                .into())
            }
        },
        Constraint::Pattern { regex, example, .. } => {
            if !regex.is_match(value) {
                let hint = example
                    .as_deref()
                    .map(|e| format!(" (e.g. {e})"))
                    .unwrap_or_default();
                return Err(ValidationError::new(
                    part,
                    format!("{value:?} is not a valid {} for {}{hint}", rule.label(part), rule.name()),
                )
                .into());
            }
            value.to_string()
        }
        Constraint::CountryCode => {
            if value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ValidationError::new(
                    part,
                    format!("{value:?} is not an ISO 3166-1 alpha-2 country code"),
                )
                .into());
            }
            value.to_ascii_uppercase()
        }
    };

    Ok(Some(canonical))
}

/// Validate `value` for `part` under `rule`, given the other assigned fields.
///
/// Adds cross-field checks on top of [`validate`]: a postal code must start
/// with the prefix of the assigned administrative area, when that area
/// defines one.
pub fn validate_in_context(
    rule: &LocaleRule,
    part: AddressPart,
    value: &str,
    context: &BTreeMap<AddressPart, String>,
) -> Result<Option<String>, AddressError> {
    let canonical = validate(rule, part, value)?;

    if let (AddressPart::PostalCode, Some(postal)) = (part, canonical.as_deref()) {
        let area = context.get(&AddressPart::AdministrativeArea);
        if let Some(choice) = area.and_then(|a| rule.choice(AddressPart::AdministrativeArea, a)) {
            if let Some(prefix) = &choice.postal_prefix {
                if !prefix.matches(postal) {
                    return Err(ValidationError::new(
                        part,
                        format!(
                            "{postal:?} is not a valid {} for {}",
                            rule.label(part),
                            choice.name
                        ),
                    )
                    .into());
                }
            }
        }
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleTable;

    fn us() -> std::sync::Arc<RuleTable> {
        RuleTable::builtin()
    }

    #[test]
    fn accepts_us_zip() {
        let table = us();
        let rule = table.rules_for("US");
        assert_eq!(
            validate(rule, AddressPart::PostalCode, " 90210 ").unwrap(),
            Some("90210".to_string())
        );
        assert_eq!(
            validate(rule, AddressPart::PostalCode, "90210-1234").unwrap(),
            Some("90210-1234".to_string())
        );
    }

    #[test]
    fn rejects_non_numeric_default_postal_code() {
        let table = us();
        let err = validate(table.default_rules(), AddressPart::PostalCode, "ABCDE").unwrap_err();
        assert_eq!(err.field(), Some(AddressPart::PostalCode));
        assert!(err.to_string().contains("postal_code"), "{err}");
    }

    #[test]
    fn rejects_field_outside_locale() {
        let table = us();
        let err = validate(table.rules_for("US"), AddressPart::SortingCode, "X").unwrap_err();
        assert_eq!(
            err,
            AddressError::UnrecognizedField {
                key: "sorting_code".into(),
                locale: Some("US".into())
            }
        );
    }

    #[test]
    fn significance_checked_before_emptiness() {
        let table = us();
        let err = validate(table.rules_for("US"), AddressPart::SortingCode, "").unwrap_err();
        assert!(matches!(err, AddressError::UnrecognizedField { .. }));
    }

    #[test]
    fn mandatory_field_rejects_empty() {
        let table = us();
        let err = validate(table.rules_for("US"), AddressPart::Locality, "   ").unwrap_err();
        assert!(err.to_string().contains("required"), "{err}");
    }

    #[test]
    fn optional_field_empty_clears() {
        let table = us();
        assert_eq!(
            validate(table.rules_for("US"), AddressPart::Organization, "").unwrap(),
            None
        );
    }

    #[test]
    fn choice_resolves_to_key() {
        let table = us();
        let rule = table.rules_for("US");
        assert_eq!(
            validate(rule, AddressPart::AdministrativeArea, "california").unwrap(),
            Some("CA".to_string())
        );
        assert_eq!(
            validate(rule, AddressPart::AdministrativeArea, "ca").unwrap(),
            Some("CA".to_string())
        );
        assert!(validate(rule, AddressPart::AdministrativeArea, "Narnia").is_err());
    }

    #[test]
    fn country_is_upper_cased() {
        let table = us();
        assert_eq!(
            validate(table.default_rules(), AddressPart::Country, "us").unwrap(),
            Some("US".to_string())
        );
        assert!(validate(table.default_rules(), AddressPart::Country, "USA").is_err());
        assert!(validate(table.default_rules(), AddressPart::Country, "U1").is_err());
    }

    #[test]
    fn text_length_is_bounded() {
        let table = us();
        let long = "x".repeat(500);
        assert!(validate(table.rules_for("US"), AddressPart::StreetAddress, &long).is_err());
    }

    #[test]
    fn postal_prefix_applies_in_context() {
        let table = us();
        let rule = table.rules_for("US");
        let mut context = BTreeMap::new();
        context.insert(AddressPart::AdministrativeArea, "CA".to_string());

        assert!(validate_in_context(rule, AddressPart::PostalCode, "94043", &context).is_ok());
        let err = validate_in_context(rule, AddressPart::PostalCode, "10001", &context).unwrap_err();
        assert!(err.to_string().contains("California"), "{err}");

        // Without an area the prefix does not apply.
        assert!(
            validate_in_context(rule, AddressPart::PostalCode, "10001", &BTreeMap::new()).is_ok()
        );
    }
}
