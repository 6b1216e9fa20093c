//! Numeric range: `between`.

use super::BuildContext;
use crate::rule::{Operator, SearchRule, ValueType};

/// Exactly two non-blank values, `[low, high]`.
pub(crate) fn applies(rule: &SearchRule, operator: Operator) -> bool {
    rule.value_type == ValueType::Numeric
        && operator == Operator::Between
        && rule.values.len() == 2
        && rule.usable_values().len() == 2
}

/// `{ ?instance field VAR  FILTER ( VAR > low) FILTER ( VAR < high) }`
///
/// Both bounds are exclusive. Values are emitted verbatim.
pub(crate) fn build(rule: &SearchRule, ctx: &BuildContext<'_>) -> String {
    let values = rule.usable_values();
    let [low, high] = values[..] else {
        return String::new();
    };

    let (binding, var) = ctx.bind_field(rule);
    format!(
        "{{ {}  FILTER ( {} > {}) FILTER ( {} < {}) }}",
        binding,
        var,
        low.trim(),
        var,
        high.trim()
    )
}
