//! Free-text search through the full-text index connector.

use tracing::debug;

use super::BuildContext;
use crate::error::{RuleError, RuleResult};
use crate::escape::escape_literal;
use crate::rule::{Operator, SearchRule, ValueType};

pub(crate) fn applies(rule: &SearchRule, operator: Operator) -> bool {
    rule.value_type == ValueType::Fts
        && matches!(operator, Operator::Contains | Operator::FreeText)
        && rule.has_usable_value()
}

/// `{ VAR a <index> ; solr:query "<text>" ; solr:entities ?instance . }`
///
/// The raw text goes through the configured preparer first. Its errors are
/// returned as they are.
pub(crate) fn build(rule: &SearchRule, ctx: &BuildContext<'_>) -> RuleResult<String> {
    let raw = rule.usable_values().join(" ");
    if raw.is_empty() {
        return Ok(String::new());
    }

    let prepared = ctx.preparer.prepare(&raw).map_err(RuleError::FullText)?;
    if prepared.trim().is_empty() {
        debug!("Full-text preparer returned nothing for '{}'", raw);
        return Ok(String::new());
    }

    let search = ctx.fresh();
    Ok(format!(
        "{{ {} a {} ; solr:query \"{}\" ; solr:entities {} . }}",
        search,
        ctx.config.fts_index,
        escape_literal(&prepared),
        ctx.candidate()
    ))
}
