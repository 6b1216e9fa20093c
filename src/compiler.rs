//! Rule compiler.
//!
//! Picks the operation for a rule and appends its fragment to a caller-owned
//! sink. The compiler holds no per-call state, so one instance can be shared
//! between threads; the sink is the caller's to serialize.

use std::fmt::Write;

use tracing::{debug, trace};

use crate::config::CompilerConfig;
use crate::error::RuleResult;
use crate::fts::{FtsQueryPreparer, KeywordPreparer};
use crate::operations::{BuildContext, Operation};
use crate::rule::SearchRule;
use crate::vars::VariableGenerator;

/// Compiles single search rules into SPARQL fragments.
pub struct RuleCompiler {
    config: CompilerConfig,
    variables: Box<dyn VariableGenerator>,
    preparer: Box<dyn FtsQueryPreparer>,
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl RuleCompiler {
    /// Compiler using the configured variable style and [`KeywordPreparer`].
    pub fn new(config: CompilerConfig) -> Self {
        let variables = config.variables.style.generator();
        Self {
            config,
            variables,
            preparer: Box::new(KeywordPreparer),
        }
    }

    /// Replace the variable generator.
    pub fn with_variables(mut self, variables: impl VariableGenerator + 'static) -> Self {
        self.variables = Box::new(variables);
        self
    }

    /// Replace the full-text preparer.
    pub fn with_preparer(mut self, preparer: impl FtsQueryPreparer + 'static) -> Self {
        self.preparer = Box::new(preparer);
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// The operation that would handle `rule`.
    pub fn select(&self, rule: &SearchRule) -> Option<Operation> {
        Operation::select(rule)
    }

    /// Append the fragment for `rule` to `out`.
    ///
    /// Returns the operation used, or `None` when no operation applies. A rule
    /// that selects an operation but carries nothing usable appends nothing.
    pub fn compile_into<W: Write + ?Sized>(
        &self,
        rule: &SearchRule,
        out: &mut W,
    ) -> RuleResult<Option<Operation>> {
        let Some(operation) = Operation::select(rule) else {
            debug!("No operation for rule {}", rule);
            return Ok(None);
        };
        debug!("Compiling rule {} with {}", rule, operation);

        let ctx = BuildContext {
            config: &self.config,
            variables: self.variables.as_ref(),
            preparer: self.preparer.as_ref(),
        };
        let fragment = operation.build(rule, &ctx)?;
        if fragment.is_empty() {
            debug!("Rule {} compiled to an empty fragment", rule);
        } else {
            trace!("Fragment: {}", fragment);
            out.write_str(&fragment)?;
        }
        Ok(Some(operation))
    }

    /// Compile `rule` into a new string.
    pub fn compile(&self, rule: &SearchRule) -> RuleResult<String> {
        let mut out = String::new();
        self.compile_into(rule, &mut out)?;
        Ok(out)
    }
}

impl std::fmt::Debug for RuleCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleCompiler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
