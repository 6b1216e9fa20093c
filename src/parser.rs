//! Compact rule syntax, parsed with nom.
//!
//! # Syntax Overview
//!
//! ```text
//! string(dcterms:title) contains ["foo", bar]
//! ──┬─── ──────┬─────── ───┬──── ─────┬──────
//!   │          │           │          │
//!   │          │           │          └── Values (optional)
//!   │          │           └── Operator
//!   │          └── Field
//!   └── Value type
//! ```
//!
//! Values are double-quoted strings (`\"` and `\\` escapes) or bare tokens.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while1},
    character::complete::{alpha1, char, multispace0},
    combinator::{map, opt, value},
    multi::separated_list0,
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::error::{RuleError, RuleResult};
use crate::rule::{SearchRule, ValueType};

/// Parse one rule.
pub fn parse(input: &str) -> RuleResult<SearchRule> {
    let input = input.trim();

    match parse_rule(input) {
        Ok(("", (value_type, field, operator, values))) => Ok(SearchRule {
            field: field.to_string(),
            value_type: value_type.parse::<ValueType>()?,
            operator: Some(operator.to_string()),
            values,
        }),
        Ok((remaining, _)) => Err(RuleError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(RuleError::parse(
            input.len() - e.input.len(),
            format!("Parse failed: {:?}", e.code),
        )),
        Err(e) => Err(RuleError::parse(0, format!("Parse failed: {:?}", e))),
    }
}

/// Parse one rule per line. Blank lines and `#` comments are skipped.
pub fn parse_rules(input: &str) -> RuleResult<Vec<SearchRule>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse)
        .collect()
}

type RuleParts<'a> = (&'a str, &'a str, &'a str, Vec<String>);

fn parse_rule(input: &str) -> IResult<&str, RuleParts<'_>> {
    let (input, value_type) = alpha1(input)?;
    let (input, field) = delimited(
        terminated(char('('), multispace0),
        parse_field,
        preceded(multispace0, char(')')),
    )(input)?;
    let (input, _) = multispace0(input)?;
    let (input, operator) = parse_operator(input)?;
    let (input, values) = opt(preceded(multispace0, parse_values))(input)?;

    Ok((input, (value_type, field, operator, values.unwrap_or_default())))
}

/// Field identifier: prefixed names like `emf:title` or `<full-iri>`.
fn parse_field(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '(' && c != ')')(input)
}

fn parse_operator(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// `[v1, "v 2", ...]`, trailing comma allowed.
fn parse_values(input: &str) -> IResult<&str, Vec<String>> {
    delimited(
        terminated(char('['), multispace0),
        terminated(
            separated_list0(tuple((multispace0, char(','), multispace0)), parse_value),
            tuple((multispace0, opt(char(',')), multispace0)),
        ),
        char(']'),
    )(input)
}

fn parse_value(input: &str) -> IResult<&str, String> {
    alt((parse_quoted, map(parse_bare, str::to_string)))(input)
}

fn parse_bare(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, ',' | '[' | ']' | '"'))(input)
}

fn parse_quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(
            char('"'),
            opt(escaped_transform(
                is_not("\\\""),
                '\\',
                alt((value("\\", tag("\\")), value("\"", tag("\"")))),
            )),
            char('"'),
        ),
        Option::unwrap_or_default,
    )(input)
}
