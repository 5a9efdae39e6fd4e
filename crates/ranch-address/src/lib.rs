//! # ranch-address: The Address Engine
//!
//! An [`Address`] is built one field at a time. Each assignment is checked
//! against the rules of the locale selected by the address's `country`
//! (or the default locale while no country is set), and either commits or
//! fails with a typed error leaving the address untouched.
//!
//! ## Modules
//!
//! - [`address`]: the mutable entity and its state transitions.
//! - [`schema`]: field-type descriptors and the serializable schema export.
//! - [`submission`]: ordering an unordered batch of `key → value` pairs so
//!   that fields other fields depend on are assigned first.
//!
//! ## Ordering contract
//!
//! Later fields' legality depends on earlier ones (mostly on `country`).
//! The engine never reorders individual `set_field` calls; batch callers use
//! [`submission::order_submission`] (or [`submission::submit`]) to get the
//! significance order of the target locale.
//!
//! ## Re-validation policy
//!
//! Every successful assignment leaves every assigned field valid under the
//! resulting locale. Changing `country` or `administrative_area` re-checks
//! the other fields; if any no longer fits, the assignment is rejected as a
//! whole.

pub mod address;
pub mod schema;
pub mod submission;

pub use address::Address;
pub use schema::{export, ChoiceOption, FieldDescriptor, FieldType, SchemaExport};
pub use submission::{order_submission, resolve_keys, submission_order, submit};

pub use ranch_core::{AddressError, AddressPart, ValidationError, ValueKind};
pub use ranch_locale::{LocaleRule, RuleTable, DEFAULT_LOCALE};
