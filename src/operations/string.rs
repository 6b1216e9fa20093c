//! Case-insensitive matching on literal values: equals, contains,
//! starts_with, ends_with and the negations of the last three.

use tracing::trace;

use super::{BuildContext, relation};
use crate::escape::quote_regex;
use crate::rule::{Operator, SearchRule, ValueType};

/// Where the quoted value is pinned inside the regex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    None,
    Start,
    End,
    /// Whole value.
    Exact,
}

impl Anchor {
    /// Regex pattern for one value: lower-cased, quoted, anchored.
    pub fn pattern(&self, value: &str) -> String {
        let quoted = quote_regex(&value.to_lowercase());
        match self {
            Anchor::None => quoted,
            Anchor::Start => format!("^{}", quoted),
            Anchor::End => format!("{}$", quoted),
            Anchor::Exact => format!("^{}$", quoted),
        }
    }
}

pub(crate) fn applies(rule: &SearchRule, operator: Operator, expected: Operator) -> bool {
    rule.value_type == ValueType::String && operator == expected
}

/// `{ ?instance field VAR  FILTER ( regex(...) || regex(...)) }`
///
/// Negated variants wrap the same block in `FILTER NOT EXISTS`, so instances
/// without the property match as well.
pub(crate) fn build(rule: &SearchRule, ctx: &BuildContext<'_>, anchor: Anchor, negated: bool) -> String {
    let values = rule.usable_values();
    if values.is_empty() {
        return String::new();
    }

    let (binding, var) = ctx.bind_field(rule);
    let alternatives: Vec<String> = values
        .iter()
        .map(|v| format!("regex(lcase(str({})), \"{}\", \"i\")", var, anchor.pattern(v)))
        .collect();
    trace!("{} regex alternatives on {}", alternatives.len(), rule.field);

    let block = format!(
        "{{ {}  FILTER ( {}) }}",
        binding,
        alternatives.join(" || ")
    );
    if negated {
        format!("FILTER NOT EXISTS {}", block)
    } else {
        block
    }
}

/// Exact match, ignoring case.
///
/// When every value is a URI (holds an unescaped `:`) the field is matched
/// with direct triples instead of a regex.
pub(crate) fn build_equals(rule: &SearchRule, ctx: &BuildContext<'_>) -> String {
    let values = rule.usable_values();
    if !rule.is_any_field() && !values.is_empty() && values.iter().all(|v| relation::is_uri(v)) {
        return relation::build_set_to(rule, ctx);
    }
    build(rule, ctx, Anchor::Exact, false)
}
