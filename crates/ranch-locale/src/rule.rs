//! # Locale Rules
//!
//! A [`LocaleRule`] is the bundle of field requirements selected by a
//! country code: which fields are significant and in what order they must be
//! evaluated, which are mandatory, how they are labelled, and what values
//! they accept.
//!
//! Rules are built from the YAML representation in [`RawLocale`] and
//! checked structurally on the way in. Regexes are compiled anchored, so a
//! pattern of `\d{5}` accepts exactly five digits.

use std::collections::BTreeMap;

use ranch_core::{AddressPart, ValueKind};
use regex::Regex;
use serde::Deserialize;

use crate::error::{RuleTableError, RuleTableResult};

/// Constraint reported for `country` in every locale.
pub const COUNTRY_PATTERN: &str = "[A-Z]{2}";

static COUNTRY_CONSTRAINT: Constraint = Constraint::CountryCode;
static UNCONSTRAINED: Constraint = Constraint::Text { max_length: None };

// ---------------------------------------------------------------------------
// Constraint types
// ---------------------------------------------------------------------------

/// Leading pattern a postal code must match inside one administrative area.
#[derive(Debug, Clone)]
pub struct PostalPrefix {
    source: String,
    regex: Regex,
}

impl PostalPrefix {
    /// Compile a prefix pattern. The pattern is anchored at the start only.
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})"))?;
        Ok(Self { source, regex })
    }

    /// The pattern as written in the rule data.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, postal_code: &str) -> bool {
        self.regex.is_match(postal_code)
    }
}

/// One option of a [`Constraint::Choice`].
#[derive(Debug, Clone)]
pub struct Choice {
    /// Canonical value stored on the address.
    pub key: String,
    /// Display name; also accepted on input.
    pub name: String,
    /// Postal codes inside this area must start with this pattern.
    pub postal_prefix: Option<PostalPrefix>,
}

impl Choice {
    /// Case-insensitive match against the key or the display name.
    pub fn matches(&self, value: &str) -> bool {
        self.key.eq_ignore_ascii_case(value) || self.name.to_lowercase() == value.to_lowercase()
    }
}

/// What values a field accepts.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Any non-empty text, optionally bounded in characters.
    Text { max_length: Option<usize> },
    /// One of a fixed set of options.
    Choice(Vec<Choice>),
    /// Text matching an anchored regular expression.
    Pattern {
        source: String,
        regex: Regex,
        example: Option<String>,
    },
    /// ISO 3166-1 alpha-2 code. Fixed for `country` in every locale.
    CountryCode,
}

impl Constraint {
    /// Compile an anchored pattern constraint.
    pub fn pattern(source: impl Into<String>, example: Option<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self::Pattern {
            source,
            regex,
            example,
        })
    }

    /// The value kind advertised for this constraint.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text { .. } => ValueKind::Text,
            Self::Choice(_) => ValueKind::Choice,
            Self::Pattern { .. } | Self::CountryCode => ValueKind::Pattern,
        }
    }

    /// The pattern source, for pattern-kind constraints.
    pub fn pattern_source(&self) -> Option<&str> {
        match self {
            Self::Pattern { source, .. } => Some(source),
            Self::CountryCode => Some(COUNTRY_PATTERN),
            _ => None,
        }
    }

    /// An example of an accepted value, if the rule data provides one.
    pub fn example(&self) -> Option<&str> {
        match self {
            Self::Pattern { example, .. } => example.as_deref(),
            Self::CountryCode => Some("US"),
            _ => None,
        }
    }

    /// The options of a choice constraint; empty otherwise.
    pub fn choices(&self) -> &[Choice] {
        match self {
            Self::Choice(choices) => choices,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// LocaleRule
// ---------------------------------------------------------------------------

/// Address rules for one locale.
#[derive(Debug, Clone)]
pub struct LocaleRule {
    key: String,
    name: String,
    fields: Vec<AddressPart>,
    required: Vec<AddressPart>,
    labels: BTreeMap<AddressPart, String>,
    constraints: BTreeMap<AddressPart, Constraint>,
}

impl LocaleRule {
    /// Locale key (`US`, `GB`, `ZZ` for the default).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Significant fields in evaluation order. `country` is always first.
    pub fn significant_fields(&self) -> &[AddressPart] {
        &self.fields
    }

    pub fn is_significant(&self, part: AddressPart) -> bool {
        self.fields.contains(&part)
    }

    /// Position of `part` in the evaluation order.
    pub fn position(&self, part: AddressPart) -> Option<usize> {
        self.fields.iter().position(|p| *p == part)
    }

    /// Mandatory fields, in evaluation order.
    pub fn required_fields(&self) -> &[AddressPart] {
        &self.required
    }

    pub fn is_required(&self, part: AddressPart) -> bool {
        self.required.contains(&part)
    }

    /// Label for `part`: the locale override, else the catalog default.
    pub fn label(&self, part: AddressPart) -> &str {
        self.labels
            .get(&part)
            .map(String::as_str)
            .unwrap_or_else(|| part.label())
    }

    /// Constraint for `part`. Unconstrained fields accept any text.
    pub fn constraint(&self, part: AddressPart) -> &Constraint {
        if part == AddressPart::Country {
            return &COUNTRY_CONSTRAINT;
        }
        self.constraints.get(&part).unwrap_or(&UNCONSTRAINED)
    }

    /// The choice for `part` matching `value`, if `part` is a choice field.
    pub fn choice(&self, part: AddressPart, value: &str) -> Option<&Choice> {
        self.constraint(part).choices().iter().find(|c| c.matches(value))
    }

    /// The postal prefix tied to an administrative area value, if any.
    pub fn postal_prefix_for(&self, area: &str) -> Option<&PostalPrefix> {
        self.choice(AddressPart::AdministrativeArea, area)
            .and_then(|c| c.postal_prefix.as_ref())
    }

    /// Default rules built in code, used when embedded data cannot be loaded.
    pub(crate) fn fallback_default() -> Self {
        Self {
            key: crate::table::DEFAULT_LOCALE.to_string(),
            name: "Default".to_string(),
            fields: vec![
                AddressPart::Country,
                AddressPart::AdministrativeArea,
                AddressPart::Locality,
                AddressPart::Recipient,
                AddressPart::Organization,
                AddressPart::StreetAddress,
                AddressPart::PostalCode,
                AddressPart::SortingCode,
            ],
            required: vec![AddressPart::Locality, AddressPart::StreetAddress],
            labels: BTreeMap::new(),
            constraints: BTreeMap::new(),
        }
    }

    /// Build and check a rule from its YAML representation.
    pub(crate) fn from_raw(raw: RawLocale) -> RuleTableResult<Self> {
        let key = raw.key.trim().to_ascii_uppercase();
        if key.len() != 2 || !key.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RuleTableError::InvalidLocaleKey { locale: raw.key });
        }

        if raw.fields.first() != Some(&AddressPart::Country) {
            return Err(RuleTableError::CountryNotFirst { locale: key });
        }
        for (i, field) in raw.fields.iter().enumerate() {
            if raw.fields[..i].contains(field) {
                return Err(RuleTableError::DuplicateField {
                    locale: key,
                    field: *field,
                });
            }
        }

        let unlisted = |section: &'static str, field: AddressPart| RuleTableError::UnlistedField {
            locale: key.clone(),
            section,
            field,
        };
        if let Some(field) = raw.required.iter().find(|f| !raw.fields.contains(f)) {
            return Err(unlisted("required", *field));
        }
        if let Some(field) = raw.labels.keys().find(|f| !raw.fields.contains(f)) {
            return Err(unlisted("labels", *field));
        }
        if let Some(field) = raw.constraints.keys().find(|f| !raw.fields.contains(f)) {
            return Err(unlisted("constraints", *field));
        }

        // Keep required fields in evaluation order, without repeats.
        let required: Vec<AddressPart> = raw
            .fields
            .iter()
            .copied()
            .filter(|f| raw.required.contains(f))
            .collect();

        let mut constraints = BTreeMap::new();
        for (field, spec) in raw.constraints {
            let constraint = spec.compile(&key, field)?;
            constraints.insert(field, constraint);
        }

        if required.len() < raw.required.len() {
            tracing::warn!(locale = %key, "repeated entries in required list ignored");
        }
        let has_prefixes = constraints
            .get(&AddressPart::AdministrativeArea)
            .is_some_and(|c| c.choices().iter().any(|choice| choice.postal_prefix.is_some()));
        if has_prefixes && !raw.fields.contains(&AddressPart::PostalCode) {
            tracing::warn!(locale = %key, "postal prefixes declared without postal_code; they are never checked");
        }

        Ok(Self {
            key,
            name: raw.name,
            fields: raw.fields,
            required,
            labels: raw.labels,
            constraints,
        })
    }
}

// ---------------------------------------------------------------------------
// YAML representation
// ---------------------------------------------------------------------------

/// One locale as written in rule data.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawLocale {
    key: String,
    name: String,
    fields: Vec<AddressPart>,
    #[serde(default)]
    required: Vec<AddressPart>,
    #[serde(default)]
    labels: BTreeMap<AddressPart, String>,
    #[serde(default)]
    constraints: BTreeMap<AddressPart, RawConstraint>,
}

impl RawLocale {
    pub(crate) fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConstraint {
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    choices: Option<Vec<RawChoice>>,
    #[serde(default)]
    max_length: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawChoice {
    key: String,
    name: String,
    #[serde(default)]
    postal_prefix: Option<String>,
}

impl RawConstraint {
    fn compile(self, locale: &str, field: AddressPart) -> RuleTableResult<Constraint> {
        let invalid = |detail: &str| RuleTableError::InvalidConstraint {
            locale: locale.to_string(),
            field,
            detail: detail.to_string(),
        };
        let bad_pattern = |source: regex::Error| RuleTableError::InvalidPattern {
            locale: locale.to_string(),
            field,
            source,
        };

        if field == AddressPart::Country {
            return Err(invalid("country is always an ISO 3166-1 alpha-2 code"));
        }

        match (self.pattern, self.choices, self.max_length) {
            (Some(pattern), None, None) => {
                let constraint = Constraint::pattern(pattern, self.example).map_err(bad_pattern)?;
                if let (Constraint::Pattern { regex, .. }, Some(example)) =
                    (&constraint, constraint.example())
                {
                    if !regex.is_match(example) {
                        return Err(invalid("example does not match pattern"));
                    }
                }
                Ok(constraint)
            }
            (None, Some(raw_choices), None) => {
                if raw_choices.is_empty() {
                    return Err(invalid("choice list is empty"));
                }
                if field != AddressPart::AdministrativeArea
                    && raw_choices.iter().any(|c| c.postal_prefix.is_some())
                {
                    return Err(invalid("postal_prefix is only allowed on administrative_area"));
                }
                let mut choices: Vec<Choice> = Vec::with_capacity(raw_choices.len());
                for raw in raw_choices {
                    if choices.iter().any(|c| c.matches(&raw.key) || c.matches(&raw.name)) {
                        return Err(invalid(&format!("choice {:?} is ambiguous", raw.key)));
                    }
                    let postal_prefix = raw
                        .postal_prefix
                        .map(PostalPrefix::new)
                        .transpose()
                        .map_err(bad_pattern)?;
                    choices.push(Choice {
                        key: raw.key,
                        name: raw.name,
                        postal_prefix,
                    });
                }
                Ok(Constraint::Choice(choices))
            }
            (None, None, max_length) => {
                if self.example.is_some() {
                    return Err(invalid("example requires a pattern"));
                }
                Ok(Constraint::Text { max_length })
            }
            _ => Err(invalid("pattern, choices and max_length are mutually exclusive")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn raw(yaml: &str) -> RawLocale {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn builds_rule_from_yaml() {
        let rule = LocaleRule::from_raw(raw(
            r#"
key: us
name: United States
fields: [country, administrative_area, locality, postal_code]
required: [postal_code, locality]
labels:
  postal_code: ZIP code
constraints:
  administrative_area:
    choices:
      - { key: CA, name: California, postal_prefix: '9[0-5]|96[01]' }
  postal_code:
    pattern: '\d{5}'
    example: '95014'
"#,
        ))
        .unwrap();

        assert_eq!(rule.key(), "US");
        assert_eq!(
            rule.required_fields(),
            &[AddressPart::Locality, AddressPart::PostalCode]
        );
        assert_eq!(rule.label(AddressPart::PostalCode), "ZIP code");
        assert_eq!(rule.label(AddressPart::Locality), "City");
        assert_eq!(rule.constraint(AddressPart::PostalCode).kind(), ValueKind::Pattern);
        assert_eq!(rule.constraint(AddressPart::Locality).kind(), ValueKind::Text);
        assert_eq!(rule.constraint(AddressPart::Country).pattern_source(), Some(COUNTRY_PATTERN));
        assert!(rule.choice(AddressPart::AdministrativeArea, "california").is_some());

        let prefix = rule.postal_prefix_for("CA").unwrap();
        assert!(prefix.matches("94043"));
        assert!(!prefix.matches("10001"));
    }

    #[test]
    fn pattern_is_anchored() {
        let constraint = Constraint::pattern(r"\d{5}", None).unwrap();
        let Constraint::Pattern { regex, .. } = constraint else {
            panic!("expected pattern");
        };
        assert!(regex.is_match("12345"));
        assert!(!regex.is_match("123456"));
        assert!(!regex.is_match("x12345"));
    }

    #[test]
    fn rejects_country_not_first() {
        let err = LocaleRule::from_raw(raw("{key: XX, name: X, fields: [locality, country]}"))
            .unwrap_err();
        assert!(matches!(err, RuleTableError::CountryNotFirst { .. }));
    }

    #[test]
    fn rejects_duplicate_field() {
        let err = LocaleRule::from_raw(raw(
            "{key: XX, name: X, fields: [country, locality, locality]}",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            RuleTableError::DuplicateField {
                field: AddressPart::Locality,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unlisted_required_field() {
        let err = LocaleRule::from_raw(raw(
            "{key: XX, name: X, fields: [country], required: [postal_code]}",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            RuleTableError::UnlistedField {
                section: "required",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_locale_key() {
        let err =
            LocaleRule::from_raw(raw("{key: USA, name: X, fields: [country]}")).unwrap_err();
        assert!(matches!(err, RuleTableError::InvalidLocaleKey { .. }));
    }

    #[test]
    fn rejects_bad_regex() {
        let err = LocaleRule::from_raw(raw(
            "{key: XX, name: X, fields: [country, postal_code], constraints: {postal_code: {pattern: '(['}}}",
        ))
        .unwrap_err();
        assert!(matches!(err, RuleTableError::InvalidPattern { .. }));
    }

    #[test]
    fn rejects_example_not_matching() {
        let err = LocaleRule::from_raw(raw(
            "{key: XX, name: X, fields: [country, postal_code], constraints: {postal_code: {pattern: '\\d{4}', example: '123'}}}",
        ))
        .unwrap_err();
        assert!(matches!(err, RuleTableError::InvalidConstraint { .. }));
    }

    #[test]
    fn rejects_mixed_constraint() {
        let err = LocaleRule::from_raw(raw(
            "{key: XX, name: X, fields: [country, locality], constraints: {locality: {pattern: 'a', max_length: 3}}}",
        ))
        .unwrap_err();
        assert!(matches!(err, RuleTableError::InvalidConstraint { .. }));
    }

    #[test]
    fn rejects_country_constraint() {
        let err = LocaleRule::from_raw(raw(
            "{key: XX, name: X, fields: [country], constraints: {country: {pattern: '[A-Z]{3}'}}}",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            RuleTableError::InvalidConstraint {
                field: AddressPart::Country,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_yaml_keys() {
        let result: Result<RawLocale, _> =
            serde_yaml::from_str("{key: XX, name: X, fields: [country], zip: 1}");
        assert!(result.is_err());
    }

    /// Collects formatted log output emitted while `f` runs.
    fn logs_during(f: impl FnOnce()) -> String {
        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Buffer {
            fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(bytes);
                Ok(bytes.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn warns_on_prefixes_without_postal_code() {
        let logs = logs_during(|| {
            let rule = LocaleRule::from_raw(raw(
                r#"
key: XA
name: Prefix Land
fields: [country, administrative_area, locality]
constraints:
  administrative_area:
    choices:
      - { key: N, name: North, postal_prefix: '1' }
"#,
            ))
            .unwrap();
            assert!(!rule.is_significant(AddressPart::PostalCode));
        });
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("postal prefixes declared without postal_code"), "{logs}");
        assert!(logs.contains("XA"), "{logs}");
    }

    #[test]
    fn warns_on_repeated_required_field() {
        let logs = logs_during(|| {
            let rule = LocaleRule::from_raw(raw(
                r#"
key: XB
name: Repeat Land
fields: [country, locality]
required: [locality, locality]
"#,
            ))
            .unwrap();
            assert_eq!(rule.required_fields(), &[AddressPart::Locality]);
        });
        assert!(logs.contains("repeated entries in required list ignored"), "{logs}");
    }

    #[test]
    fn well_formed_rule_logs_no_warning() {
        let logs = logs_during(|| {
            LocaleRule::from_raw(raw(
                "key: XC\nname: Quiet Land\nfields: [country, locality]\nrequired: [locality]\n",
            ))
            .unwrap();
        });
        assert!(!logs.contains("WARN"), "{logs}");
    }
}
