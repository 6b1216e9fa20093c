//! Fresh variable names for compiled fragments.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of every generated variable.
pub const VARIABLE_PREFIX: &str = "?v";

/// Source of collision-free variable names.
///
/// Implementations are shared between threads; every call must return a name
/// not handed out before within the same compiled query.
pub trait VariableGenerator: Send + Sync {
    fn next_variable(&self) -> String;
}

/// `?v` followed by a dash-less random UUID. Unique without coordination.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidVariables;

impl VariableGenerator for UuidVariables {
    fn next_variable(&self) -> String {
        format!("{}{}", VARIABLE_PREFIX, Uuid::new_v4().simple())
    }
}

/// `?v1`, `?v2`, ... Deterministic output for tests and diffs.
#[derive(Debug, Default)]
pub struct SequentialVariables {
    counter: AtomicUsize,
}

impl SequentialVariables {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableGenerator for SequentialVariables {
    fn next_variable(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{}", VARIABLE_PREFIX, n)
    }
}

/// Which generator a compiler is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableStyle {
    #[default]
    Uuid,
    Sequential,
}

impl VariableStyle {
    pub fn generator(&self) -> Box<dyn VariableGenerator> {
        match self {
            VariableStyle::Uuid => Box::new(UuidVariables),
            VariableStyle::Sequential => Box::new(SequentialVariables::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_variables_are_unique() {
        let vars = UuidVariables;
        let names: HashSet<String> = (0..1000).map(|_| vars.next_variable()).collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_uuid_variable_shape() {
        let name = UuidVariables.next_variable();
        assert!(name.starts_with("?v"));
        assert_eq!(name.len(), 2 + 32);
        assert!(name[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sequential_variables() {
        let vars = SequentialVariables::new();
        assert_eq!(vars.next_variable(), "?v1");
        assert_eq!(vars.next_variable(), "?v2");
        assert_eq!(vars.next_variable(), "?v3");
    }

    #[test]
    fn test_sequential_variables_across_threads() {
        let vars = std::sync::Arc::new(SequentialVariables::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let vars = vars.clone();
                std::thread::spawn(move || (0..100).map(|_| vars.next_variable()).collect::<Vec<_>>())
            })
            .collect();
        let mut all = HashSet::new();
        for h in handles {
            for name in h.join().unwrap() {
                assert!(all.insert(name));
            }
        }
        assert_eq!(all.len(), 400);
    }
}
