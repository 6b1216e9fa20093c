//! Instance identity: `in` / `instanceIds`.

use super::BuildContext;
use crate::rule::{Operator, SearchRule, ValueType};

pub(crate) fn applies(rule: &SearchRule, operator: Operator) -> bool {
    rule.value_type == ValueType::Object
        && operator == Operator::InstanceIds
        && rule.has_usable_value()
}

/// `FILTER ( ?instance = id1 || ?instance = id2 )`
///
/// The field is ignored. Identifiers are opaque and written unescaped, in
/// input order.
pub(crate) fn build(rule: &SearchRule, ctx: &BuildContext<'_>) -> String {
    let candidate = ctx.candidate();
    let tests: Vec<String> = rule
        .usable_values()
        .into_iter()
        .map(|id| format!("{} = {}", candidate, id))
        .collect();
    if tests.is_empty() {
        return String::new();
    }
    format!("FILTER ( {} )", tests.join(" || "))
}
