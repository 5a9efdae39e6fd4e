//! # Submission Ordering
//!
//! Batch callers receive `key → value` pairs in no particular order, but a
//! field's legality can depend on fields evaluated before it. These helpers
//! put a batch into the evaluation order of its target locale:
//!
//! 1. the locale is the one named by the batch's `country`, or the base
//!    locale when the batch carries none;
//! 2. fields significant for that locale come first, in its order;
//! 3. the remaining catalog fields follow in catalog order. `set_field`
//!    then rejects them as not used by the locale.

use ranch_core::{AddressError, AddressPart};
use ranch_locale::{LocaleRule, RuleTable};

use crate::address::Address;

/// Sort key of `part` under `rule`.
pub fn rank(rule: &LocaleRule, part: AddressPart) -> usize {
    match rule.position(part) {
        Some(position) => position,
        None => rule.significant_fields().len() + part.catalog_index(),
    }
}

/// Every catalog field in the order a batch for `rule` is evaluated.
pub fn submission_order(rule: &LocaleRule) -> Vec<AddressPart> {
    let mut order = rule.significant_fields().to_vec();
    order.extend(
        AddressPart::all()
            .iter()
            .copied()
            .filter(|part| !rule.is_significant(*part)),
    );
    order
}

/// Resolve every key of a batch through the field catalog.
///
/// # Errors
///
/// Returns [`AddressError::UnrecognizedField`] for the first unknown key.
pub fn resolve_keys<I, K, V>(pairs: I) -> Result<Vec<(AddressPart, String)>, AddressError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| Ok((AddressPart::from_key(key.as_ref())?, value.into())))
        .collect()
}

/// Resolve and sort a batch for evaluation.
///
/// `base_locale` is used when the batch does not set `country`; pass the
/// target address's current locale key.
pub fn order_submission<I, K, V>(
    table: &RuleTable,
    base_locale: &str,
    pairs: I,
) -> Result<Vec<(AddressPart, String)>, AddressError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut resolved = resolve_keys(pairs)?;
    let locale = resolved
        .iter()
        .rev()
        .find(|(part, _)| *part == AddressPart::Country)
        .map(|(_, value)| value.as_str())
        .unwrap_or(base_locale);
    let rule = table.rules_for(locale);
    resolved.sort_by_key(|(part, _)| rank(rule, *part));
    Ok(resolved)
}

/// Order a batch and apply it to `address` field by field.
///
/// Stops at the first failing field. Fields applied before the failure stay
/// assigned; callers wanting all-or-nothing work on a clone.
pub fn submit<I, K, V>(address: &mut Address, pairs: I) -> Result<(), AddressError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let ordered = order_submission(address.rules(), address.locale().key(), pairs)?;
    tracing::debug!(fields = ordered.len(), locale = address.locale().key(), "applying submission");
    for (part, value) in ordered {
        address.set_field(part, &value)?;
    }
    Ok(())
}
