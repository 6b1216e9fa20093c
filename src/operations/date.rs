//! Date comparisons against typed `xsd:dateTime` literals.

use chrono::{DateTime, NaiveDate, Utc};

use super::BuildContext;
use crate::escape::escape_literal;
use crate::rule::{Operator, SearchRule, ValueType};

const LITERAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub(crate) fn applies(rule: &SearchRule, operator: Operator, expected: Operator) -> bool {
    rule.value_type == ValueType::DateTime && operator == expected
}

/// `xsd:dateTime("...")` for a value.
///
/// RFC 3339 timestamps and plain `YYYY-MM-DD` dates are normalised to UTC
/// with millisecond precision. Anything else is passed through as written,
/// escaped as a string literal.
pub fn date_literal(value: &str) -> String {
    let trimmed = value.trim();
    let parsed = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        });

    let text = match parsed {
        Some(dt) => dt.format(LITERAL_FORMAT).to_string(),
        None => escape_literal(value),
    };
    format!("xsd:dateTime(\"{}\")", text)
}

/// `{ ?instance field VAR  FILTER ( VAR <op> xsd:dateTime("...")) }`
///
/// Needs exactly one non-blank value, anything else builds nothing.
pub(crate) fn build_compare(rule: &SearchRule, ctx: &BuildContext<'_>, op: &str) -> String {
    let values = rule.usable_values();
    let [value] = values[..] else {
        return String::new();
    };

    let (binding, var) = ctx.bind_field(rule);
    format!(
        "{{ {}  FILTER ( {} {} {}) }}",
        binding,
        var,
        op,
        date_literal(value)
    )
}

/// Inclusive range `[from, to]`; either bound may be blank.
///
/// Equal bounds collapse to a single `=` test.
pub(crate) fn build_within(rule: &SearchRule, ctx: &BuildContext<'_>) -> String {
    let bound = |i: usize| {
        rule.values
            .get(i)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    };
    if rule.values.len() > 2 {
        return String::new();
    }
    let (from, to) = (bound(0), bound(1));
    if from.is_none() && to.is_none() {
        return String::new();
    }

    let (binding, var) = ctx.bind_field(rule);
    let condition = match (from, to) {
        (Some(from), Some(to)) if date_literal(from) == date_literal(to) => {
            format!("{} = {}", var, date_literal(from))
        }
        (Some(from), Some(to)) => format!(
            "{} >= {} && {} <= {}",
            var,
            date_literal(from),
            var,
            date_literal(to)
        ),
        (Some(from), None) => format!("{} >= {}", var, date_literal(from)),
        (None, Some(to)) => format!("{} <= {}", var, date_literal(to)),
        (None, None) => return String::new(),
    };
    format!("{{ {}  FILTER ( {}) }}", binding, condition)
}
