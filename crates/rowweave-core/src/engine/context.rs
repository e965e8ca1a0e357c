use crate::{error::ResourceLimit, naming::NamingConvention};
use thiserror::Error as ThisError;

///
/// LimitExceeded
///
/// One hard limit tripped while recording budget usage.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("{limit} limit exceeded: attempted={attempted}, limit={max}")]
pub(crate) struct LimitExceeded {
    pub(crate) limit: ResourceLimit,
    pub(crate) attempted: usize,
    pub(crate) max: usize,
}

///
/// ExecutionBudget
///
/// Resource usage counters of one ingest call. Shared by every nesting level
/// of that call; `buffered_rows` counts every row appended to any nested
/// buffer over the whole call.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExecutionBudget {
    groups: usize,
    buffered_rows: usize,
}

impl ExecutionBudget {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            groups: 0,
            buffered_rows: 0,
        }
    }

    #[must_use]
    pub const fn groups(&self) -> usize {
        self.groups
    }

    #[must_use]
    pub const fn buffered_rows(&self) -> usize {
        self.buffered_rows
    }

    fn record_new_group(&mut self, config: &ExecutionConfig) -> Result<(), LimitExceeded> {
        let next = self.groups.saturating_add(1);
        if next > config.max_groups {
            return Err(LimitExceeded {
                limit: ResourceLimit::Groups,
                attempted: next,
                max: config.max_groups,
            });
        }

        self.groups = next;
        Ok(())
    }

    fn record_buffered_row(&mut self, config: &ExecutionConfig) -> Result<(), LimitExceeded> {
        let next = self.buffered_rows.saturating_add(1);
        if next > config.max_buffered_rows {
            return Err(LimitExceeded {
                limit: ResourceLimit::BufferedRows,
                attempted: next,
                max: config.max_buffered_rows,
            });
        }

        self.buffered_rows = next;
        Ok(())
    }
}

///
/// ExecutionConfig
///
/// Immutable execution policy: hard limits plus selector and key policy.
/// Limits stay policy-owned at the engine boundary instead of inside the
/// group table.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExecutionConfig {
    max_groups: usize,
    max_buffered_rows: usize,
    naming: NamingConvention,
    strict_keys: bool,
    detailed_tracing: bool,
}

impl ExecutionConfig {
    /// Build one configuration with explicit hard limits and default policy.
    #[must_use]
    pub const fn with_hard_limits(max_groups: usize, max_buffered_rows: usize) -> Self {
        Self {
            max_groups,
            max_buffered_rows,
            naming: NamingConvention::ExactMatch,
            strict_keys: false,
            detailed_tracing: false,
        }
    }

    #[must_use]
    pub const fn unbounded() -> Self {
        Self::with_hard_limits(usize::MAX, usize::MAX)
    }

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
    pub const fn with_detailed_tracing(mut self, detailed_tracing: bool) -> Self {
        self.detailed_tracing = detailed_tracing;
        self
    }

    #[must_use]
    pub const fn max_groups(&self) -> usize {
        self.max_groups
    }

    #[must_use]
    pub const fn max_buffered_rows(&self) -> usize {
        self.max_buffered_rows
    }

    #[must_use]
    pub const fn naming(&self) -> NamingConvention {
        self.naming
    }

    #[must_use]
    pub const fn strict_keys(&self) -> bool {
        self.strict_keys
    }

    #[must_use]
    pub const fn detailed_tracing(&self) -> bool {
        self.detailed_tracing
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

///
/// ExecutionContext
///
/// Execution policy plus mutable budget usage for one ingest call.
/// Passed down through every nesting level so accounting stays in one place.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ExecutionContext {
    config: ExecutionConfig,
    budget: ExecutionBudget,
}

impl ExecutionContext {
    #[must_use]
    pub(crate) const fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            budget: ExecutionBudget::new(),
        }
    }

    #[must_use]
    pub(crate) const fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    #[must_use]
    pub(crate) const fn budget(&self) -> &ExecutionBudget {
        &self.budget
    }

    pub(crate) fn record_new_group(&mut self) -> Result<(), LimitExceeded> {
        self.budget.record_new_group(&self.config)
    }

    pub(crate) fn record_buffered_row(&mut self) -> Result<(), LimitExceeded> {
        self.budget.record_buffered_row(&self.config)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_budget_rejects_the_first_group_past_the_limit() {
        let mut ctx = ExecutionContext::new(ExecutionConfig::with_hard_limits(2, usize::MAX));

        assert!(ctx.record_new_group().is_ok());
        assert!(ctx.record_new_group().is_ok());

        let err = ctx.record_new_group().expect_err("third group exceeds limit");
        assert_eq!(
            err,
            LimitExceeded {
                limit: ResourceLimit::Groups,
                attempted: 3,
                max: 2,
            }
        );
        assert_eq!(ctx.budget().groups(), 2, "failed records must not count");
    }

    #[test]
    fn buffered_row_budget_is_independent_of_groups() {
        let mut ctx = ExecutionContext::new(ExecutionConfig::with_hard_limits(usize::MAX, 1));

        assert!(ctx.record_new_group().is_ok());
        assert!(ctx.record_buffered_row().is_ok());
        assert!(ctx.record_buffered_row().is_err());
        assert_eq!(ctx.budget().buffered_rows(), 1);
    }

    #[test]
    fn unbounded_config_is_the_default() {
        assert_eq!(ExecutionConfig::default(), ExecutionConfig::unbounded());
        assert_eq!(ExecutionConfig::default().max_groups(), usize::MAX);
    }
}
