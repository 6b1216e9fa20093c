//! Compiler configuration.
//!
//! ```toml
//! fts_index = "solr-inst:ftsearch"
//! candidate = "instance"
//!
//! [variables]
//! style = "sequential"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RuleError, RuleResult};
use crate::vars::VariableStyle;

const CONFIG_DIR: &str = "sparql-rules";
const CONFIG_FILE: &str = "config.toml";

/// Settings the compiler reads but never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Full-text connector the search node is typed with.
    pub fts_index: String,
    /// Name (without `?`) of the variable bound to the instance being matched.
    pub candidate: String,
    pub variables: VariablesConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariablesConfig {
    pub style: VariableStyle,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            fts_index: "solr-inst:ftsearch".to_string(),
            candidate: "instance".to_string(),
            variables: VariablesConfig::default(),
        }
    }
}

impl CompilerConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> RuleResult<Self> {
        let config: CompilerConfig =
            toml::from_str(content).map_err(|e| RuleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the user config file is read
    /// when present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> RuleResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => p,
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| RuleError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml(&content)
    }

    /// `<config_dir>/sparql-rules/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// The candidate variable with its `?`.
    pub fn candidate_variable(&self) -> String {
        format!("?{}", self.candidate)
    }

    fn validate(&self) -> RuleResult<()> {
        if self.fts_index.trim().is_empty() {
            return Err(RuleError::Config("fts_index must not be empty".to_string()));
        }
        let valid_name = !self.candidate.is_empty()
            && self
                .candidate
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_');
        if !valid_name {
            return Err(RuleError::Config(format!(
                "invalid candidate variable name: '{}'",
                self.candidate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.fts_index, "solr-inst:ftsearch");
        assert_eq!(config.candidate_variable(), "?instance");
        assert_eq!(config.variables.style, VariableStyle::Uuid);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = CompilerConfig::from_toml(
            r#"
            fts_index = "solr-inst:documents"

            [variables]
            style = "sequential"
            "#,
        )
        .unwrap();
        assert_eq!(config.fts_index, "solr-inst:documents");
        assert_eq!(config.candidate, "instance");
        assert_eq!(config.variables.style, VariableStyle::Sequential);
    }

    #[test]
    fn test_from_toml_rejects_bad_candidate() {
        let err = CompilerConfig::from_toml(r#"candidate = "?x y""#).unwrap_err();
        assert!(matches!(err, RuleError::Config(_)));
    }

    #[test]
    fn test_from_toml_rejects_malformed() {
        let err = CompilerConfig::from_toml("fts_index = ").unwrap_err();
        assert!(matches!(err, RuleError::Config(_)));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = CompilerConfig::load(Some(Path::new("/nonexistent/sparql-rules.toml"))).unwrap_err();
        assert!(matches!(err, RuleError::Config(_)));
    }
}
