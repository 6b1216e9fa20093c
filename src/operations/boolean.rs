//! Boolean property match: `is`.

use super::BuildContext;
use crate::rule::{Operator, SearchRule, ValueType};

pub(crate) fn applies(rule: &SearchRule, operator: Operator) -> bool {
    rule.value_type == ValueType::Boolean && operator == Operator::Is
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// `{ ?instance field "true"^^xsd:boolean }`
pub(crate) fn build(rule: &SearchRule, ctx: &BuildContext<'_>) -> String {
    let values = rule.usable_values();
    let Some(flag) = (match values[..] {
        [value] => parse_flag(value),
        _ => None,
    }) else {
        return String::new();
    };

    let predicate = if rule.is_any_field() {
        ctx.fresh()
    } else {
        rule.field.clone()
    };
    format!(
        "{{ {} {} \"{}\"^^xsd:boolean }}",
        ctx.candidate(),
        predicate,
        flag
    )
}
