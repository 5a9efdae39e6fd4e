//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. The rule table is immutable and shared by `Arc`;
//! every request builds its own [`ranch_address::Address`] on top of it.

use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use ranch_locale::{RuleTable, RuleTableResult};

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8000;

/// Server configuration read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to (`PORT`).
    pub port: u16,
    /// Locale rules file replacing the built-in table (`RANCH_RULES`).
    pub rules_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rules_path: None,
        }
    }
}

impl AppConfig {
    /// Build configuration from `PORT` and `RANCH_RULES`.
    ///
    /// An unparseable `PORT` falls back to the default.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("RANCH_RULES").ok().as_deref(),
        )
    }

    fn from_vars(port: Option<&str>, rules: Option<&str>) -> Self {
        let port = match port.map(str::parse::<u16>) {
            Some(Ok(port)) => port,
            Some(Err(e)) => {
                tracing::warn!(error = %e, default = DEFAULT_PORT, "invalid PORT, using default");
                DEFAULT_PORT
            }
            None => DEFAULT_PORT,
        };
        let rules_path = rules.filter(|p| !p.trim().is_empty()).map(PathBuf::from);
        Self { port, rules_path }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<RuleTable>,
    pub config: AppConfig,
    /// Prometheus exporter handle; `None` when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Default configuration with the built-in rules and no metrics recorder.
    pub fn new() -> Self {
        Self::with_rules(AppConfig::default(), RuleTable::builtin())
    }

    pub fn with_rules(config: AppConfig, rules: Arc<RuleTable>) -> Self {
        Self {
            rules,
            config,
            metrics: None,
        }
    }

    /// Build state from `config`, loading its rules file if one is set.
    pub fn load(config: AppConfig) -> RuleTableResult<Self> {
        let rules = match &config.rules_path {
            Some(path) => Arc::new(RuleTable::from_path(path)?),
            None => RuleTable::builtin(),
        };
        Ok(Self::with_rules(config, rules))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("locales", &self.rules.len())
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
