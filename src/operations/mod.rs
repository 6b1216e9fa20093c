//! Rule operations.
//!
//! Each [`Operation`] pairs a pure applicability test with a fragment
//! builder. The catalog is closed and ordered; [`Operation::select`] returns
//! the first entry of [`Operation::CATALOG`] that applies, so precedence is the
//! declaration order below, most specific first.

pub mod boolean;
pub mod date;
pub mod fulltext;
pub mod identity;
pub mod numeric;
pub mod relation;
pub mod string;

use std::fmt;

use crate::config::CompilerConfig;
use crate::error::RuleResult;
use crate::fts::FtsQueryPreparer;
use crate::rule::{Operator, SearchRule, ValueType};
use crate::vars::VariableGenerator;

pub use string::Anchor;

/// Everything an operation may use while building one fragment.
pub struct BuildContext<'a> {
    pub config: &'a CompilerConfig,
    pub variables: &'a dyn VariableGenerator,
    pub preparer: &'a dyn FtsQueryPreparer,
}

impl BuildContext<'_> {
    pub fn fresh(&self) -> String {
        self.variables.next_variable()
    }

    /// The implicit variable of the instance being matched, e.g. `?instance`.
    pub fn candidate(&self) -> String {
        self.config.candidate_variable()
    }

    /// Triple pattern binding a fresh variable to the rule's field.
    ///
    /// Returns the pattern (without block braces) and the value variable.
    /// For `anyField` the predicate position gets its own fresh variable too.
    pub(crate) fn bind_field(&self, rule: &SearchRule) -> (String, String) {
        let predicate = if rule.is_any_field() {
            self.fresh()
        } else {
            rule.field.clone()
        };
        let value = self.fresh();
        (
            format!("{} {} {}", self.candidate(), predicate, value),
            value,
        )
    }
}

/// One (applicability, builder) pair per supported operator/type combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    InstanceIds,
    /// `equals` on object values: direct triples.
    EqualsObject,
    FullText,
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    DoesNotContain,
    DoesNotStartWith,
    DoesNotEndWith,
    Before,
    After,
    Within,
    Between,
    Is,
    SetTo,
    NotSetTo,
}

impl Operation {
    /// All operations in precedence order.
    ///
    /// Type-specific entries come before `SetTo`/`NotSetTo`, which accept any
    /// value type.
    pub const CATALOG: [Operation; 17] = [
        Operation::InstanceIds,
        Operation::EqualsObject,
        Operation::FullText,
        Operation::Equals,
        Operation::Contains,
        Operation::StartsWith,
        Operation::EndsWith,
        Operation::DoesNotContain,
        Operation::DoesNotStartWith,
        Operation::DoesNotEndWith,
        Operation::Before,
        Operation::After,
        Operation::Within,
        Operation::Between,
        Operation::Is,
        Operation::SetTo,
        Operation::NotSetTo,
    ];

    /// First applicable operation for `rule`, if any.
    pub fn select(rule: &SearchRule) -> Option<Operation> {
        Self::CATALOG.into_iter().find(|op| op.is_applicable(rule))
    }

    /// Whether this operation handles `rule`. Never true without an operator.
    pub fn is_applicable(&self, rule: &SearchRule) -> bool {
        let Some(operator) = rule.operator() else {
            return false;
        };
        match self {
            Operation::InstanceIds => identity::applies(rule, operator),
            Operation::EqualsObject => relation::applies_equals(rule, operator),
            Operation::FullText => fulltext::applies(rule, operator),
            Operation::Equals => string::applies(rule, operator, Operator::Equals),
            Operation::Contains => string::applies(rule, operator, Operator::Contains),
            Operation::StartsWith => string::applies(rule, operator, Operator::StartsWith),
            Operation::EndsWith => string::applies(rule, operator, Operator::EndsWith),
            Operation::DoesNotContain => string::applies(rule, operator, Operator::DoesNotContain),
            Operation::DoesNotStartWith => {
                string::applies(rule, operator, Operator::DoesNotStartWith)
            }
            Operation::DoesNotEndWith => string::applies(rule, operator, Operator::DoesNotEndWith),
            Operation::Before => date::applies(rule, operator, Operator::Before),
            Operation::After => date::applies(rule, operator, Operator::After),
            Operation::Within => date::applies(rule, operator, Operator::Within),
            Operation::Between => numeric::applies(rule, operator),
            Operation::Is => boolean::applies(rule, operator),
            Operation::SetTo => relation::applies_set_to(rule, operator),
            Operation::NotSetTo => relation::applies_not_set_to(operator),
        }
    }

    /// Build the fragment for `rule`.
    ///
    /// Arity is checked again here: a rule can pass [`is_applicable`] and
    /// still carry nothing usable, which yields `""`.
    ///
    /// [`is_applicable`]: Operation::is_applicable
    pub fn build(&self, rule: &SearchRule, ctx: &BuildContext<'_>) -> RuleResult<String> {
        let fragment = match self {
            Operation::InstanceIds => identity::build(rule, ctx),
            Operation::EqualsObject => relation::build_set_to(rule, ctx),
            Operation::FullText => return fulltext::build(rule, ctx),
            Operation::Equals => string::build_equals(rule, ctx),
            Operation::Contains => string::build(rule, ctx, Anchor::None, false),
            Operation::StartsWith => string::build(rule, ctx, Anchor::Start, false),
            Operation::EndsWith => string::build(rule, ctx, Anchor::End, false),
            Operation::DoesNotContain => string::build(rule, ctx, Anchor::None, true),
            Operation::DoesNotStartWith => string::build(rule, ctx, Anchor::Start, true),
            Operation::DoesNotEndWith => string::build(rule, ctx, Anchor::End, true),
            Operation::Before => date::build_compare(rule, ctx, "<"),
            Operation::After => date::build_compare(rule, ctx, ">="),
            Operation::Within => date::build_within(rule, ctx),
            Operation::Between => numeric::build(rule, ctx),
            Operation::Is => boolean::build(rule, ctx),
            Operation::SetTo => relation::build_set_to(rule, ctx),
            Operation::NotSetTo => relation::build_not_set_to(rule, ctx),
        };
        Ok(fragment)
    }

    /// The value type this operation is restricted to, `None` for any.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Operation::InstanceIds | Operation::EqualsObject => Some(ValueType::Object),
            Operation::FullText => Some(ValueType::Fts),
            Operation::Equals
            | Operation::Contains
            | Operation::StartsWith
            | Operation::EndsWith
            | Operation::DoesNotContain
            | Operation::DoesNotStartWith
            | Operation::DoesNotEndWith => Some(ValueType::String),
            Operation::Before | Operation::After | Operation::Within => Some(ValueType::DateTime),
            Operation::Between => Some(ValueType::Numeric),
            Operation::Is => Some(ValueType::Boolean),
            Operation::SetTo | Operation::NotSetTo => None,
        }
    }

    /// Operator ids this operation answers to.
    pub fn operator_ids(&self) -> &'static [&'static str] {
        match self {
            Operation::InstanceIds => &["in", "instanceIds"],
            Operation::EqualsObject | Operation::Equals => &["equals"],
            Operation::FullText => &["contains", "fts"],
            Operation::Contains => &["contains"],
            Operation::StartsWith => &["starts_with"],
            Operation::EndsWith => &["ends_with"],
            Operation::DoesNotContain => &["does_not_contain"],
            Operation::DoesNotStartWith => &["does_not_start_with"],
            Operation::DoesNotEndWith => &["does_not_end_with"],
            Operation::Before => &["before"],
            Operation::After => &["after"],
            Operation::Within => &["within"],
            Operation::Between => &["between"],
            Operation::Is => &["is"],
            Operation::SetTo => &["set_to"],
            Operation::NotSetTo => &["not_set_to"],
        }
    }

    /// Short description of the value arity the operation needs.
    pub fn arity(&self) -> &'static str {
        match self {
            Operation::Before | Operation::After | Operation::Is => "exactly 1",
            Operation::Between => "exactly 2",
            Operation::Within => "2 (one may be blank)",
            Operation::NotSetTo => "any",
            _ => "1 or more",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::InstanceIds => "InstanceIds",
            Operation::EqualsObject => "EqualsObject",
            Operation::FullText => "FullText",
            Operation::Equals => "Equals",
            Operation::Contains => "Contains",
            Operation::StartsWith => "StartsWith",
            Operation::EndsWith => "EndsWith",
            Operation::DoesNotContain => "DoesNotContain",
            Operation::DoesNotStartWith => "DoesNotStartWith",
            Operation::DoesNotEndWith => "DoesNotEndWith",
            Operation::Before => "Before",
            Operation::After => "After",
            Operation::Within => "Within",
            Operation::Between => "Between",
            Operation::Is => "Is",
            Operation::SetTo => "SetTo",
            Operation::NotSetTo => "NotSetTo",
        };
        f.write_str(name)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn rule(value_type: ValueType, operator: &str, values: &[&str]) -> SearchRule {
        SearchRule::new("emf:field", value_type, operator, values.iter().copied())
    }

    #[test]
    fn test_no_operator_never_applies() {
        let r = SearchRule::without_operator("emf:title", ValueType::String);
        assert!(Operation::CATALOG.iter().all(|op| !op.is_applicable(&r)));
        assert_eq!(Operation::select(&r), None);

        let blank = rule(ValueType::Object, "", &["emf:1"]);
        assert_eq!(Operation::select(&blank), None);
    }

    #[test]
    fn test_unknown_operator_never_applies() {
        assert_eq!(Operation::select(&rule(ValueType::String, "matches", &["x"])), None);
    }

    #[test]
    fn test_select_by_type_and_operator() {
        assert_eq!(
            Operation::select(&rule(ValueType::String, "contains", &["x"])),
            Some(Operation::Contains)
        );
        assert_eq!(
            Operation::select(&rule(ValueType::Fts, "contains", &["x"])),
            Some(Operation::FullText)
        );
        assert_eq!(
            Operation::select(&rule(ValueType::DateTime, "after", &["2024-01-01"])),
            Some(Operation::After)
        );
        assert_eq!(
            Operation::select(&rule(ValueType::Numeric, "between", &["1", "2"])),
            Some(Operation::Between)
        );
        assert_eq!(
            Operation::select(&rule(ValueType::Object, "in", &["emf:1"])),
            Some(Operation::InstanceIds)
        );
        assert_eq!(
            Operation::select(&rule(ValueType::Object, "set_to", &["emf:1"])),
            Some(Operation::SetTo)
        );
    }

    #[test]
    fn test_select_equals_by_type() {
        assert_eq!(
            Operation::select(&rule(ValueType::Object, "equals", &["emf:Document"])),
            Some(Operation::EqualsObject)
        );
        assert_eq!(
            Operation::select(&rule(ValueType::String, "equals", &["Report"])),
            Some(Operation::Equals)
        );
        assert_eq!(Operation::select(&rule(ValueType::Object, "equals", &[""])), None);
        assert_eq!(Operation::select(&rule(ValueType::Numeric, "equals", &["1"])), None);
    }

    #[test]
    fn test_untyped_rule_only_matches_type_agnostic_operations() {
        assert_eq!(Operation::select(&rule(ValueType::Untyped, "equals", &["emf:Document"])), None);
        assert_eq!(Operation::select(&rule(ValueType::Untyped, "contains", &["x"])), None);
        assert_eq!(
            Operation::select(&rule(ValueType::Untyped, "set_to", &["emf:1"])),
            Some(Operation::SetTo)
        );
    }

    #[test]
    fn test_string_operator_on_wrong_type() {
        assert_eq!(Operation::select(&rule(ValueType::Numeric, "contains", &["x"])), None);
        assert_eq!(Operation::select(&rule(ValueType::String, "between", &["1", "2"])), None);
    }

    #[test]
    fn test_catalog_entries_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for op in Operation::CATALOG {
            assert!(seen.insert(op), "duplicate catalog entry {}", op);
        }
        assert_eq!(seen.len(), Operation::CATALOG.len());
    }

    #[test]
    fn test_typed_operations_reject_other_types() {
        let all_types = [
            ValueType::String,
            ValueType::Fts,
            ValueType::DateTime,
            ValueType::Numeric,
            ValueType::Object,
            ValueType::Boolean,
            ValueType::Untyped,
        ];
        for op in Operation::CATALOG {
            let Some(value_type) = op.value_type() else {
                continue;
            };
            for id in op.operator_ids() {
                for other in all_types.into_iter().filter(|t| *t != value_type) {
                    assert!(
                        !op.is_applicable(&rule(other, id, &["1", "2"])),
                        "{} accepted {} {}",
                        op,
                        other,
                        id
                    );
                }
            }
        }
    }
}
