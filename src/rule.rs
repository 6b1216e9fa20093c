//! The search rule: one field/operator/values condition to compile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RuleError;

/// Field sentinel: match the value of any property.
pub const ANY_FIELD: &str = "anyField";
/// Field sentinel: match any relation.
pub const ANY_RELATION: &str = "anyRelation";
/// Value sentinel: match any related object.
pub const ANY_OBJECT: &str = "anyObject";

/// Declared type of the values a rule carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    #[serde(rename = "string")]
    String,
    /// Free-text search.
    #[serde(rename = "fts")]
    Fts,
    #[serde(rename = "dateTime")]
    DateTime,
    #[serde(rename = "numeric")]
    Numeric,
    /// Instance references (relations, identifiers).
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "boolean")]
    Boolean,
    /// Blank type id. Only type-agnostic operations apply.
    #[serde(rename = "")]
    Untyped,
}

impl ValueType {
    pub fn id(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Fts => "fts",
            ValueType::DateTime => "dateTime",
            ValueType::Numeric => "numeric",
            ValueType::Object => "object",
            ValueType::Boolean => "boolean",
            ValueType::Untyped => "",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ValueType {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ValueType::String),
            "fts" => Ok(ValueType::Fts),
            "dateTime" => Ok(ValueType::DateTime),
            "numeric" => Ok(ValueType::Numeric),
            "object" => Ok(ValueType::Object),
            "boolean" => Ok(ValueType::Boolean),
            "" => Ok(ValueType::Untyped),
            other => Err(RuleError::InvalidValueType(other.to_string())),
        }
    }
}

/// Operator ids understood by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
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
    SetTo,
    NotSetTo,
    /// `in` / `instanceIds`
    InstanceIds,
    Is,
    /// Explicit free-text operator id (`fts`).
    FreeText,
}

impl Operator {
    /// Resolve an operator id. Unknown ids resolve to `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        let op = match id {
            "equals" => Operator::Equals,
            "contains" => Operator::Contains,
            "starts_with" => Operator::StartsWith,
            "ends_with" => Operator::EndsWith,
            "does_not_contain" => Operator::DoesNotContain,
            "does_not_start_with" => Operator::DoesNotStartWith,
            "does_not_end_with" => Operator::DoesNotEndWith,
            "before" => Operator::Before,
            "after" => Operator::After,
            "within" => Operator::Within,
            "between" => Operator::Between,
            "set_to" => Operator::SetTo,
            "not_set_to" => Operator::NotSetTo,
            "in" | "instanceIds" => Operator::InstanceIds,
            "is" => Operator::Is,
            "fts" => Operator::FreeText,
            _ => return None,
        };
        Some(op)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::DoesNotContain => "does_not_contain",
            Operator::DoesNotStartWith => "does_not_start_with",
            Operator::DoesNotEndWith => "does_not_end_with",
            Operator::Before => "before",
            Operator::After => "after",
            Operator::Within => "within",
            Operator::Between => "between",
            Operator::SetTo => "set_to",
            Operator::NotSetTo => "not_set_to",
            Operator::InstanceIds => "in",
            Operator::Is => "is",
            Operator::FreeText => "fts",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A single search condition.
///
/// Built once by whoever walks the condition tree, compiled once, discarded.
/// Nothing here is mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRule {
    pub field: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(rename = "value", default, deserialize_with = "one_or_many")]
    pub values: Vec<String>,
}

impl SearchRule {
    pub fn new(
        field: impl Into<String>,
        value_type: ValueType,
        operator: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            field: field.into(),
            value_type,
            operator: Some(operator.into()),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A rule whose operator has not been chosen yet.
    pub fn without_operator(field: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            value_type,
            operator: None,
            values: Vec::new(),
        }
    }

    /// The resolved operator, or `None` when missing, blank or unknown.
    pub fn operator(&self) -> Option<Operator> {
        self.operator
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .and_then(Operator::from_id)
    }

    /// Values that are not blank, in input order.
    pub fn usable_values(&self) -> Vec<&str> {
        self.values
            .iter()
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .collect()
    }

    pub fn has_usable_value(&self) -> bool {
        self.values.iter().any(|v| !v.trim().is_empty())
    }

    pub fn is_any_field(&self) -> bool {
        self.field == ANY_FIELD
    }

    pub fn is_any_relation(&self) -> bool {
        self.field == ANY_RELATION
    }
}

impl fmt::Display for SearchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) {} {:?}",
            self.value_type,
            self.field,
            self.operator.as_deref().unwrap_or("<none>"),
            self.values
        )
    }
}

/// Accept `"value": "x"` as well as `"value": ["x", "y"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Missing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(v) => vec![v],
        OneOrMany::Many(vs) => vs,
        OneOrMany::Missing(()) => Vec::new(),
    })
}
