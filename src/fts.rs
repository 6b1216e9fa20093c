//! Full-text query preparation.
//!
//! The free-text operation hands the raw user text to a [`FtsQueryPreparer`]
//! which rewrites it into the index's own query language. Tokenizing and
//! stemming live behind this trait; the compiler only embeds the result.

use crate::error::BoxError;

/// Rewrites raw search text into an index-native query string.
pub trait FtsQueryPreparer: Send + Sync {
    fn prepare(&self, raw: &str) -> Result<String, BoxError>;
}

impl<F> FtsQueryPreparer for F
where
    F: Fn(&str) -> Result<String, BoxError> + Send + Sync,
{
    fn prepare(&self, raw: &str) -> Result<String, BoxError> {
        self(raw)
    }
}

/// Default preparer: collapses whitespace and upper-cases the boolean
/// keywords `and` / `or` / `not` so the index treats them as operators.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordPreparer;

impl FtsQueryPreparer for KeywordPreparer {
    fn prepare(&self, raw: &str) -> Result<String, BoxError> {
        let words: Vec<&str> = raw.split_whitespace().collect();
        let last = words.len().saturating_sub(1);
        let prepared: Vec<String> = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                // A keyword at either end has nothing to join.
                let inner = i > 0 && i < last;
                match word.to_ascii_lowercase().as_str() {
                    "and" | "or" if inner => word.to_ascii_uppercase(),
                    "not" if i < last => word.to_ascii_uppercase(),
                    _ => (*word).to_string(),
                }
            })
            .collect();
        Ok(prepared.join(" "))
    }
}

/// Passes text through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct VerbatimPreparer;

impl FtsQueryPreparer for VerbatimPreparer {
    fn prepare(&self, raw: &str) -> Result<String, BoxError> {
        Ok(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_upper_cased() {
        let out = KeywordPreparer.prepare("cats or dogs and   birds").unwrap();
        assert_eq!(out, "cats OR dogs AND birds");
    }

    #[test]
    fn test_keywords_at_edges_untouched() {
        let out = KeywordPreparer.prepare("or cats and").unwrap();
        assert_eq!(out, "or cats and");
    }

    #[test]
    fn test_not_prefix() {
        let out = KeywordPreparer.prepare("not draft").unwrap();
        assert_eq!(out, "NOT draft");
    }

    #[test]
    fn test_words_containing_keywords_untouched() {
        let out = KeywordPreparer.prepare("order android").unwrap();
        assert_eq!(out, "order android");
    }

    #[test]
    fn test_verbatim_preparer() {
        assert_eq!(VerbatimPreparer.prepare("a  or b").unwrap(), "a  or b");
    }

    #[test]
    fn test_closure_preparer() {
        let preparer = |raw: &str| -> Result<String, BoxError> { Ok(format!("+{}", raw)) };
        assert_eq!(preparer.prepare("x").unwrap(), "+x");
    }
}
