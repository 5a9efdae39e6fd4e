//! # API Route Modules
//!
//! - `address`: schema export and ordered address submission.
//! - `locales`: the locales the rule table knows.

pub mod address;
pub mod locales;
