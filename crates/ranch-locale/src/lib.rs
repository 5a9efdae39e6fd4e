//! # ranch-locale: Locale Rule Tables
//!
//! Captures, per country, which address fields matter and what values they
//! accept:
//!
//! - [`LocaleRule`]: significant fields in evaluation order, mandatory
//!   fields, labels, and per-field [`Constraint`]s.
//! - [`RuleTable`]: every locale keyed by ISO 3166-1 alpha-2 code, with a
//!   default rule set (`ZZ`) for anything not listed.
//! - [`validate`] / [`validate_in_context`]: the pure validator that decides
//!   whether a value is acceptable for a field under a rule.
//!
//! ## Data
//!
//! The built-in table is compiled in from `data/locales.yaml` and parsed
//! once on first use. Operators can load an alternative file through
//! [`RuleTable::from_path`]; it goes through the same structural checks and
//! regex compilation, so a bad file fails at startup rather than on the
//! first request.

pub mod error;
pub mod rule;
pub mod table;
pub mod validate;

pub use error::{RuleTableError, RuleTableResult};
pub use rule::{Choice, Constraint, LocaleRule, PostalPrefix};
pub use table::{RuleTable, DEFAULT_LOCALE};
pub use validate::{validate, validate_in_context};
