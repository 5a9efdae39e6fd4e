//! # ranch-core: Foundational Types for Ranch
//!
//! The leaf of the Ranch dependency graph. Defines the closed set of address
//! fields, the primitive value kinds a field can take, and the error types
//! every validation path returns.
//!
//! ## Key Design Principles
//!
//! 1. **Single `AddressPart` enum.** One definition, exhaustive `match`
//!    everywhere. Wire keys resolve through a total lookup that returns an
//!    explicit error instead of panicking.
//!
//! 2. **Constant catalog.** The field catalog is a `static` table: no
//!    initialization order, no locks, safe for any number of readers.
//!
//! 3. **Errors are data.** Rejections are `thiserror` values carrying the
//!    offending field; nothing in the engine signals bad input by panicking.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ranch-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod catalog;
pub mod error;
pub mod kind;

// Re-export primary types for ergonomic imports.
pub use catalog::{AddressPart, FieldSpec, ADDRESS_PART_COUNT};
pub use error::{AddressError, ValidationError};
pub use kind::ValueKind;
