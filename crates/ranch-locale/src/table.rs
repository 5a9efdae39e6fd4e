//! # Rule Table
//!
//! The read-only registry of locale rules. Built once (from the embedded
//! data or an operator-supplied file) and shared by reference afterwards;
//! every lookup is infallible because unknown locales resolve to the
//! default rule set.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use ranch_core::AddressPart;
use serde::Deserialize;

use crate::error::{RuleTableError, RuleTableResult};
use crate::rule::{LocaleRule, RawLocale};

/// Key of the default locale.
pub const DEFAULT_LOCALE: &str = "ZZ";

/// Locale data compiled into the binary.
const BUILTIN_RULES: &str = include_str!("../data/locales.yaml");

static BUILTIN: LazyLock<Arc<RuleTable>> = LazyLock::new(|| match RuleTable::from_yaml(BUILTIN_RULES) {
    Ok(table) => {
        tracing::debug!(locales = table.len(), "loaded built-in locale rules");
        Arc::new(table)
    }
    Err(e) => {
        tracing::error!(error = %e, "built-in locale rules failed to load; using default rules only");
        Arc::new(RuleTable::fallback())
    }
});

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    locales: Vec<RawLocale>,
}

/// All locale rules, keyed by upper-case locale key.
#[derive(Debug, Clone)]
pub struct RuleTable {
    default: LocaleRule,
    locales: BTreeMap<String, LocaleRule>,
}

impl RuleTable {
    /// The built-in table, parsed on first use and shared thereafter.
    pub fn builtin() -> Arc<RuleTable> {
        Arc::clone(&BUILTIN)
    }

    /// Parse and check a rule table from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleTableError`] if the YAML is malformed, a locale fails
    /// its structural checks, a pattern does not compile, a locale is
    /// defined twice, or no default (`ZZ`) locale exists.
    pub fn from_yaml(yaml: &str) -> RuleTableResult<Self> {
        let raw: RawTable = serde_yaml::from_str(yaml)?;

        let mut default = None;
        let mut locales = BTreeMap::new();
        for raw_locale in raw.locales {
            let original_key = raw_locale.key().to_string();
            let rule = LocaleRule::from_raw(raw_locale)?;
            if rule.key() == DEFAULT_LOCALE {
                if default.replace(rule).is_some() {
                    return Err(RuleTableError::DuplicateLocale {
                        locale: original_key,
                    });
                }
                continue;
            }
            if locales.contains_key(rule.key()) {
                return Err(RuleTableError::DuplicateLocale {
                    locale: original_key,
                });
            }
            locales.insert(rule.key().to_string(), rule);
        }

        let default = default.ok_or(RuleTableError::MissingDefault)?;
        Ok(Self { default, locales })
    }

    /// Load a rule table from a YAML file.
    pub fn from_path(path: &Path) -> RuleTableResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RuleTableError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                RuleTableError::Io(e)
            }
        })?;
        let table = Self::from_yaml(&content)?;
        tracing::info!(path = %path.display(), locales = table.len(), "loaded locale rules");
        Ok(table)
    }

    /// A table holding only the code-defined default rules.
    pub fn fallback() -> Self {
        Self {
            default: LocaleRule::fallback_default(),
            locales: BTreeMap::new(),
        }
    }

    /// Rules for `locale_key`, or the default rules if the key is unknown.
    ///
    /// Lookup ignores case and surrounding whitespace.
    pub fn rules_for(&self, locale_key: &str) -> &LocaleRule {
        let key = locale_key.trim().to_ascii_uppercase();
        self.locales.get(&key).unwrap_or(&self.default)
    }

    /// Significant fields of `locale_key` in evaluation order.
    pub fn significant_fields(&self, locale_key: &str) -> &[AddressPart] {
        self.rules_for(locale_key).significant_fields()
    }

    /// The default rule set.
    pub fn default_rules(&self) -> &LocaleRule {
        &self.default
    }

    /// Whether `locale_key` has rules of its own.
    pub fn contains(&self, locale_key: &str) -> bool {
        let key = locale_key.trim().to_ascii_uppercase();
        key == DEFAULT_LOCALE || self.locales.contains_key(&key)
    }

    /// Every locale, default first, then by key.
    pub fn locales(&self) -> impl Iterator<Item = &LocaleRule> {
        std::iter::once(&self.default).chain(self.locales.values())
    }

    /// Number of locales including the default.
    pub fn len(&self) -> usize {
        self.locales.len() + 1
    }

    /// Always false: a table has at least its default locale.
    pub fn is_empty(&self) -> bool {
        false
    }
}
