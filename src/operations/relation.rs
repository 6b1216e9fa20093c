//! Relation presence: `set_to`, `not_set_to` and `equals` on objects.
//!
//! Values are instance references and are written as-is. `anyRelation` in the
//! field position and `anyObject` in the value position become fresh
//! variables.

use tracing::trace;

use super::BuildContext;
use crate::rule::{ANY_OBJECT, Operator, SearchRule, ValueType};

pub(crate) fn applies_set_to(rule: &SearchRule, operator: Operator) -> bool {
    operator == Operator::SetTo && rule.has_usable_value()
}

pub(crate) fn applies_not_set_to(operator: Operator) -> bool {
    operator == Operator::NotSetTo
}

/// `equals` on object values is a direct triple, same shape as `set_to`.
pub(crate) fn applies_equals(rule: &SearchRule, operator: Operator) -> bool {
    rule.value_type == ValueType::Object && operator == Operator::Equals && rule.has_usable_value()
}

/// A prefixed name or IRI: holds a `:` that is not escaped.
pub(crate) fn is_uri(value: &str) -> bool {
    value.contains(':') && !value.contains("\\:")
}

/// `?instance <field> <value>` with wildcards replaced.
fn triple(rule: &SearchRule, value: &str, ctx: &BuildContext<'_>) -> String {
    let predicate = if rule.is_any_relation() {
        ctx.fresh()
    } else {
        rule.field.clone()
    };
    let object = if value.trim() == ANY_OBJECT {
        ctx.fresh()
    } else {
        value.trim().to_string()
    };
    format!("{} {} {}", ctx.candidate(), predicate, object)
}

/// One value: `{ ?instance field v }`.
/// Several: `{ { ?instance field v1 } UNION { ?instance field v2 } }`.
pub(crate) fn build_set_to(rule: &SearchRule, ctx: &BuildContext<'_>) -> String {
    let branches: Vec<String> = rule
        .usable_values()
        .into_iter()
        .map(|v| format!("{{ {} }}", triple(rule, v, ctx)))
        .collect();
    trace!("set_to on {} with {} branch(es)", rule.field, branches.len());

    match branches.len() {
        0 => String::new(),
        1 => branches.concat(),
        _ => format!("{{ {} }}", branches.join(" UNION ")),
    }
}

/// `FILTER NOT EXISTS { ?instance field v }`, one block per value.
///
/// Separate blocks mean "related to none of the values". No usable values
/// builds nothing.
pub(crate) fn build_not_set_to(rule: &SearchRule, ctx: &BuildContext<'_>) -> String {
    rule.usable_values()
        .into_iter()
        .map(|v| format!("FILTER NOT EXISTS {{ {} }}", triple(rule, v, ctx)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::test_support::Fixture;
    use crate::rule::ANY_RELATION;
    use pretty_assertions::assert_eq;

    fn relation(field: &str, operator: &str, values: &[&str]) -> SearchRule {
        SearchRule::new(field, ValueType::Object, operator, values.iter().copied())
    }

    #[test]
    fn test_set_to_single() {
        let fx = Fixture::new();
        assert_eq!(
            build_set_to(&relation("emf:hasParent", "set_to", &["emf:123"]), &fx.ctx()),
            "{ ?instance emf:hasParent emf:123 }"
        );
    }

    #[test]
    fn test_set_to_union() {
        let fx = Fixture::new();
        assert_eq!(
            build_set_to(&relation("emf:hasParent", "set_to", &["emf:1", "emf:2"]), &fx.ctx()),
            "{ { ?instance emf:hasParent emf:1 } UNION { ?instance emf:hasParent emf:2 } }"
        );
    }

    #[test]
    fn test_set_to_requires_value() {
        assert!(!applies_set_to(&relation("f", "set_to", &[]), Operator::SetTo));
        assert!(!applies_set_to(&relation("f", "set_to", &[" "]), Operator::SetTo));
        assert!(applies_set_to(&relation("f", "set_to", &["emf:1"]), Operator::SetTo));
    }

    #[test]
    fn test_any_relation_and_any_object() {
        let fx = Fixture::new();
        assert_eq!(
            build_set_to(&relation(ANY_RELATION, "set_to", &["emf:1"]), &fx.ctx()),
            "{ ?instance ?v1 emf:1 }"
        );
        assert_eq!(
            build_set_to(&relation("emf:references", "set_to", &[ANY_OBJECT]), &fx.ctx()),
            "{ ?instance emf:references ?v2 }"
        );
    }

    #[test]
    fn test_any_relation_fresh_predicate_per_branch() {
        let fx = Fixture::new();
        assert_eq!(
            build_set_to(&relation(ANY_RELATION, "set_to", &["emf:1", "emf:2"]), &fx.ctx()),
            "{ { ?instance ?v1 emf:1 } UNION { ?instance ?v2 emf:2 } }"
        );
        assert_eq!(
            build_set_to(&relation(ANY_RELATION, "set_to", &[ANY_OBJECT]), &fx.ctx()),
            "{ ?instance ?v3 ?v4 }"
        );
    }

    #[test]
    fn test_not_set_to_any_relation() {
        let fx = Fixture::new();
        assert_eq!(
            build_not_set_to(&relation(ANY_RELATION, "not_set_to", &["emf:1", "emf:2"]), &fx.ctx()),
            "FILTER NOT EXISTS { ?instance ?v1 emf:1 } FILTER NOT EXISTS { ?instance ?v2 emf:2 }"
        );
    }

    #[test]
    fn test_equals_on_objects() {
        let fx = Fixture::new();
        let rule = relation("rdf:type", "equals", &["emf:Document"]);
        assert!(applies_equals(&rule, Operator::Equals));
        assert_eq!(build_set_to(&rule, &fx.ctx()), "{ ?instance rdf:type emf:Document }");

        assert!(!applies_equals(&relation("rdf:type", "equals", &[" "]), Operator::Equals));
        let string = SearchRule::new("rdf:type", ValueType::String, "equals", ["emf:Document"]);
        assert!(!applies_equals(&string, Operator::Equals));
    }

    #[test]
    fn test_is_uri() {
        assert!(is_uri("emf:Document"));
        assert!(is_uri("http://example.org/a"));
        assert!(!is_uri("Report"));
        assert!(!is_uri(r"10\:30"));
    }

    #[test]
    fn test_not_set_to_one_block_per_value() {
        let fx = Fixture::new();
        assert_eq!(
            build_not_set_to(&relation("emf:hasChild", "not_set_to", &["emf:1", "emf:2"]), &fx.ctx()),
            "FILTER NOT EXISTS { ?instance emf:hasChild emf:1 } FILTER NOT EXISTS { ?instance emf:hasChild emf:2 }"
        );
    }

    #[test]
    fn test_not_set_to_any_arity() {
        let fx = Fixture::new();
        assert!(applies_not_set_to(Operator::NotSetTo));
        assert_eq!(build_not_set_to(&relation("f", "not_set_to", &[]), &fx.ctx()), "");
        assert_eq!(build_not_set_to(&relation("f", "not_set_to", &["", " "]), &fx.ctx()), "");
    }

    #[test]
    fn test_not_set_to_any_object() {
        let fx = Fixture::new();
        assert_eq!(
            build_not_set_to(&relation("emf:hasChild", "not_set_to", &[ANY_OBJECT]), &fx.ctx()),
            "FILTER NOT EXISTS { ?instance emf:hasChild ?v1 }"
        );
    }
}
