//! Caller-facing configuration for one engine instance.

use crate::{engine::ExecutionConfig, naming::NamingConvention};
use serde::{Deserialize, Serialize};

///
/// WeaveConfig
///
/// Immutable per-engine settings. Every field has a default, so partial
/// documents deserialize cleanly.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeaveConfig {
    /// Translation applied when a selector does not name a column verbatim.
    pub naming: NamingConvention,

    /// Fail with `MissingKeyComponent` instead of grouping on a null key
    /// component when the key does not skip nulls.
    pub strict_keys: bool,

    /// Hard cap on groups created by one ingest call, across all levels.
    pub max_groups: Option<usize>,

    /// Hard cap on rows buffered for nested mappings by one ingest call.
    pub max_buffered_rows: Option<usize>,

    /// Emit one trace event per row dropped for a null key.
    pub detailed_tracing: bool,
}

impl WeaveConfig {
    #[must_use]
    pub const fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.naming = naming;
        self
    }

    #[must_use]
    pub const fn with_strict_keys(mut self, strict_keys: bool) -> Self {
        self.strict_keys = strict_keys;
        self
    }

    #[must_use]
    pub const fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = Some(max_groups);
        self
    }

    #[must_use]
    pub const fn with_max_buffered_rows(mut self, max_buffered_rows: usize) -> Self {
        self.max_buffered_rows = Some(max_buffered_rows);
        self
    }

    #[must_use]
    pub const fn with_detailed_tracing(mut self, detailed_tracing: bool) -> Self {
        self.detailed_tracing = detailed_tracing;
        self
    }

    /// Lower this configuration into the engine's execution policy.
    #[must_use]
    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig::with_hard_limits(
            self.max_groups.unwrap_or(usize::MAX),
            self.max_buffered_rows.unwrap_or(usize::MAX),
        )
        .with_naming(self.naming)
        .with_strict_keys(self.strict_keys)
        .with_detailed_tracing(self.detailed_tracing)
    }
}

impl From<&WeaveConfig> for ExecutionConfig {
    fn from(config: &WeaveConfig) -> Self {
        config.execution_config()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unbounded_and_lenient() {
        let exec = WeaveConfig::default().execution_config();

        assert_eq!(exec.max_groups(), usize::MAX);
        assert_eq!(exec.max_buffered_rows(), usize::MAX);
        assert!(!exec.strict_keys());
        assert_eq!(exec.naming(), NamingConvention::ExactMatch);
    }

    #[test]
    fn partial_json_documents_fill_defaults() {
        let config: WeaveConfig =
            serde_json::from_str(r#"{ "naming": "snake_case", "max_groups": 50 }"#)
                .expect("config document");

        assert_eq!(config.naming, NamingConvention::SnakeCase);
        assert_eq!(config.max_groups, Some(50));
        assert_eq!(config.max_buffered_rows, None);
        assert!(!config.strict_keys);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_str::<WeaveConfig>(r#"{ "batch_size": 1000 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn builder_settings_flow_into_execution_config() {
        let exec = WeaveConfig::default()
            .with_naming(NamingConvention::CamelCase)
            .with_strict_keys(true)
            .with_max_buffered_rows(8)
            .execution_config();

        assert_eq!(exec.naming(), NamingConvention::CamelCase);
        assert!(exec.strict_keys());
        assert_eq!(exec.max_buffered_rows(), 8);
        assert_eq!(exec.max_groups(), usize::MAX);
    }
}
