//! # Address
//!
//! The incrementally built address. Holds the assigned field values and a
//! shared handle to the immutable rule table.
//!
//! ## State machine
//!
//! An address is empty or partially filled, with or without a country. The
//! only transition is [`Address::set_field`]; there is no finalize step and
//! every state is queryable. [`Address::check_complete`] reports missing
//! mandatory fields whenever the caller decides it is done.
//!
//! ## Atomicity
//!
//! `set_field` builds a candidate field map, validates the new value, then
//! re-validates every other assigned field against the candidate locale and
//! the candidate values it depends on. The address is only replaced by the
//! candidate once all checks pass.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;
use ranch_core::{AddressError, AddressPart, ValidationError};
use ranch_locale::{validate_in_context, LocaleRule, RuleTable, DEFAULT_LOCALE};

use crate::schema::FieldType;
use crate::submission::rank;

/// A postal address under construction.
#[derive(Debug, Clone)]
pub struct Address {
    rules: Arc<RuleTable>,
    fields: BTreeMap<AddressPart, String>,
}

impl Address {
    /// An empty address using the built-in rule table.
    pub fn new() -> Self {
        Self::with_rules(RuleTable::builtin())
    }

    /// An empty address using `rules`.
    pub fn with_rules(rules: Arc<RuleTable>) -> Self {
        Self {
            rules,
            fields: BTreeMap::new(),
        }
    }

    /// The rule table this address validates against.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Rules of the current locale: the assigned country's, else the default.
    pub fn locale(&self) -> &LocaleRule {
        locale_of(&self.rules, &self.fields)
    }

    /// The assigned value of `part`.
    pub fn get(&self, part: AddressPart) -> Option<&str> {
        self.fields.get(&part).map(String::as_str)
    }

    /// Assigned fields in catalog order.
    pub fn fields(&self) -> impl Iterator<Item = (AddressPart, &str)> {
        self.fields.iter().map(|(part, value)| (*part, value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Type and constraint descriptors for the current locale's fields, in
    /// significance order.
    pub fn get_field_types(&self) -> IndexMap<AddressPart, FieldType> {
        let rule = self.locale();
        rule.significant_fields()
            .iter()
            .map(|part| (*part, FieldType::describe(rule, *part, &self.fields)))
            .collect()
    }

    /// Assign `value` to `part`.
    ///
    /// Empty values clear optional fields and are rejected for mandatory
    /// ones. Assigning `country` switches the locale for this and every
    /// later call.
    ///
    /// # Errors
    ///
    /// - [`AddressError::UnrecognizedField`] if the current locale does not
    ///   use `part`.
    /// - [`AddressError::Invalid`] if `value` fails its constraint, or if a
    ///   previously assigned field no longer validates (including one the
    ///   new locale does not use). The error names that other field.
    ///
    /// On error the address is unchanged.
    pub fn set_field(&mut self, part: AddressPart, value: &str) -> Result<(), AddressError> {
        let current = locale_of(&self.rules, &self.fields);
        let canonical = match validate_in_context(current, part, value, &self.fields) {
            Ok(canonical) => canonical,
            Err(e) => {
                tracing::debug!(field = %part, locale = current.key(), error = %e, "field rejected");
                return Err(e);
            }
        };

        let mut candidate = self.fields.clone();
        match canonical {
            Some(v) => candidate.insert(part, v),
            None => candidate.remove(&part),
        };

        let rule = locale_of(&self.rules, &candidate);
        if let Err(e) = revalidate(rule, part, &mut candidate) {
            tracing::debug!(field = %part, locale = rule.key(), error = %e, "assignment conflicts with assigned fields");
            return Err(e);
        }

        tracing::debug!(field = %part, locale = rule.key(), "field accepted");
        self.fields = candidate;
        Ok(())
    }

    /// Resolve `key` through the field catalog, then [`Address::set_field`].
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<(), AddressError> {
        let part = AddressPart::from_key(key)?;
        self.set_field(part, value)
    }

    /// Mandatory fields of the current locale that are not assigned.
    pub fn missing_required(&self) -> Vec<AddressPart> {
        self.locale()
            .required_fields()
            .iter()
            .copied()
            .filter(|part| !self.fields.contains_key(part))
            .collect()
    }

    /// Check that every mandatory field of the current locale is assigned.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Invalid`] naming the first missing field in
    /// significance order.
    pub fn check_complete(&self) -> Result<(), AddressError> {
        let rule = self.locale();
        match self.missing_required().first() {
            Some(part) => Err(ValidationError::new(
                *part,
                format!("{} is required in {}", rule.label(*part), rule.name()),
            )
            .into()),
            None => Ok(()),
        }
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new()
    }
}

fn locale_of<'a>(rules: &'a RuleTable, fields: &BTreeMap<AddressPart, String>) -> &'a LocaleRule {
    let key = fields
        .get(&AddressPart::Country)
        .map(String::as_str)
        .unwrap_or(DEFAULT_LOCALE);
    rules.rules_for(key)
}

/// Re-check every assigned field other than `changed` against `rule`, in
/// significance order, storing re-canonicalized values.
fn revalidate(
    rule: &LocaleRule,
    changed: AddressPart,
    candidate: &mut BTreeMap<AddressPart, String>,
) -> Result<(), AddressError> {
    let mut assigned: Vec<AddressPart> = candidate
        .keys()
        .copied()
        .filter(|part| *part != changed)
        .collect();
    assigned.sort_by_key(|part| rank(rule, *part));

    for other in assigned {
        let Some(value) = candidate.get(&other).cloned() else {
            continue;
        };
        match validate_in_context(rule, other, &value, candidate) {
            Ok(Some(canonical)) => {
                candidate.insert(other, canonical);
            }
            Ok(None) => {
                candidate.remove(&other);
            }
            Err(e) => {
                return Err(ValidationError::new(
                    other,
                    format!("{value:?} is no longer valid after {changed} changed: {}", e.reason()),
                )
                .into());
            }
        }
    }
    Ok(())
}
