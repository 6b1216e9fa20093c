//! # sparql-rules
//!
//! Compiles single search rules (field, value type, operator, values) into
//! SPARQL graph-pattern and filter fragments for a triple store.
//!
//! ## Quick Example
//!
//! ```
//! use sparql_rules::prelude::*;
//!
//! let compiler = RuleCompiler::default().with_variables(SequentialVariables::new());
//! let rule = SearchRule::new("emf:hasParent", ValueType::Object, "set_to", ["emf:1", "emf:2"]);
//!
//! let mut query = String::new();
//! compiler.compile_into(&rule, &mut query).unwrap();
//! assert_eq!(
//!     query,
//!     "{ { ?instance emf:hasParent emf:1 } UNION { ?instance emf:hasParent emf:2 } }"
//! );
//! ```
//!
//! ## Operators
//!
//! | Type       | Operator                                   | Fragment                         |
//! |------------|--------------------------------------------|----------------------------------|
//! | `string`   | `equals`                                   | anchored `regex`, or triple(s)   |
//! | `string`   | `contains` `starts_with` `ends_with`       | case-insensitive `regex` filter  |
//! | `string`   | `does_not_contain` ... `does_not_end_with` | `FILTER NOT EXISTS` + regex      |
//! | `dateTime` | `before` `after` `within`                  | `xsd:dateTime` comparison        |
//! | `numeric`  | `between`                                  | two exclusive filters            |
//! | `boolean`  | `is`                                       | typed boolean triple             |
//! | `object`   | `in` / `instanceIds`                       | identity filter on `?instance`   |
//! | `object`   | `equals`                                   | triple `UNION`                   |
//! | `fts`      | `contains`                                 | full-text index join             |
//! | any        | `set_to` `not_set_to`                      | triple `UNION` / `NOT EXISTS`    |
//!
//! A rule without an operator, or without usable values, compiles to the
//! empty string.

pub mod compiler;
pub mod config;
pub mod error;
pub mod escape;
pub mod fts;
pub mod operations;
pub mod parser;
pub mod rule;
pub mod vars;

pub mod prelude {
    pub use crate::compiler::RuleCompiler;
    pub use crate::config::CompilerConfig;
    pub use crate::error::*;
    pub use crate::fts::{FtsQueryPreparer, KeywordPreparer, VerbatimPreparer};
    pub use crate::operations::Operation;
    pub use crate::parser::{parse, parse_rules};
    pub use crate::rule::{ANY_FIELD, ANY_OBJECT, ANY_RELATION, Operator, SearchRule, ValueType};
    pub use crate::vars::{SequentialVariables, UuidVariables, VariableGenerator, VariableStyle};
}

/// Parse a rule in compact syntax.
///
/// # Example
///
/// ```
/// use sparql_rules::parse;
///
/// let rule = parse("numeric(emf:size) between [23, 101]").unwrap();
/// assert_eq!(rule.field, "emf:size");
/// ```
pub fn parse(input: &str) -> Result<rule::SearchRule, error::RuleError> {
    parser::parse(input)
}
