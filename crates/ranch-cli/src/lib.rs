//! # ranch-cli: CLI Tool for the Address Engine
//!
//! ## Subcommands
//!
//! - `ranch schema`: print the field schema of a locale as JSON.
//! - `ranch validate`: apply an address file and report the first rejection.
//! - `ranch locales`: list the locales of the rule table.
//!
//! ```bash
//! ranch schema --country US
//! ranch validate address.json --complete
//! ranch --rules ./locales.yaml locales
//! ```
//!
//! Every subcommand returns an exit code: 0 on success, 1 when the input is
//! rejected, 2 on operational errors (unreadable files, bad rule data).

pub mod locales;
pub mod schema;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ranch_locale::RuleTable;

/// Load the rule table from `path`, or the built-in table when `None`.
pub fn load_rules(path: Option<&Path>) -> Result<Arc<RuleTable>> {
    match path {
        Some(path) => {
            let table = RuleTable::from_path(path)
                .with_context(|| format!("failed to load locale rules from {}", path.display()))?;
            Ok(Arc::new(table))
        }
        None => Ok(RuleTable::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rules_without_path() {
        let rules = load_rules(None).unwrap();
        assert!(rules.contains("US"));
    }

    #[test]
    fn missing_rules_file_has_context() {
        let err = load_rules(Some(Path::new("/nonexistent/locales.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load locale rules"));
    }

    #[test]
    fn invalid_rules_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locales.yaml");
        std::fs::write(&path, "locales: [{key: DE, name: Germany, fields: [country]}]").unwrap();
        assert!(load_rules(Some(&path)).is_err());
    }
}
