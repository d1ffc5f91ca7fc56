//! Variable handling for import paths and loaded fragments.
//!
//! Placeholder syntax and property lookup belong to the host; the engine
//! needs two capabilities from it:
//! - expanding a raw import path before resolution (path phase)
//! - finding placeholder occurrences inside a string (dirname phase)
//!
//! The dirname phase itself lives here: every string leaf of a loaded
//! fragment has its `dirname` placeholders replaced with the fragment's
//! directory relative to the project root.

use crate::types::DIRNAME_VARIABLE;
use anyhow::Result;
use async_trait::async_trait;
use regex_lite::Regex;
use serde_json::Value;
use std::collections::HashMap;

/// One placeholder occurrence inside a string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMatch {
    /// The variable name inside the delimiters.
    pub name: String,
    /// The exact matched token, delimiters included.
    pub token: String,
}

/// Host seam for placeholder syntax and property lookup.
#[async_trait]
pub trait VariableEngine: Send + Sync {
    /// Expand placeholders in a raw import path before resolution.
    async fn resolve_path(&self, raw: &str) -> Result<String>;

    /// Placeholder occurrences in a string value; empty means none.
    fn matches(&self, value: &str) -> Vec<PlaceholderMatch>;
}

/// `${...}` placeholder engine backed by a static property table.
///
/// Path-phase expansion substitutes known properties; unknown placeholders
/// are left intact for the host to resolve later.
pub struct BasicVariableEngine {
    pattern: Regex,
    properties: HashMap<String, String>,
}

impl BasicVariableEngine {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\$\{([^{}]+)\}").expect("placeholder pattern is valid"),
            properties: HashMap::new(),
        }
    }

    /// Add a property available to path-phase expansion.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

impl Default for BasicVariableEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VariableEngine for BasicVariableEngine {
    async fn resolve_path(&self, raw: &str) -> Result<String> {
        let mut resolved = raw.to_string();
        for placeholder in self.matches(raw) {
            if let Some(value) = self.properties.get(&placeholder.name) {
                resolved = resolved.replace(&placeholder.token, value);
            }
        }
        Ok(resolved)
    }

    fn matches(&self, value: &str) -> Vec<PlaceholderMatch> {
        self.pattern
            .captures_iter(value)
            .map(|caps| PlaceholderMatch {
                name: caps[1].trim().to_string(),
                token: caps[0].to_string(),
            })
            .collect()
    }
}

/// Replace `dirname` placeholders in every string leaf of a fragment.
///
/// Only tokens whose variable name is exactly `dirname` are touched; other
/// placeholders stay behind for the host. Replacement is a substring
/// substitution of the matched token, so mixed values keep their shape.
/// `import_dir` is the fragment's directory relative to the project root in
/// forward-slash form. Mutates the fragment in place.
pub fn substitute_dirname(fragment: &mut Value, engine: &dyn VariableEngine, import_dir: &str) {
    match fragment {
        Value::String(text) => {
            let placeholders = engine.matches(text);
            if placeholders.is_empty() {
                return;
            }
            let mut rewritten = text.clone();
            for placeholder in placeholders {
                if placeholder.name == DIRNAME_VARIABLE {
                    rewritten = rewritten.replace(&placeholder.token, import_dir);
                }
            }
            *text = rewritten;
        }
        Value::Object(map) => {
            for value in map.values_mut() {
                substitute_dirname(value, engine, import_dir);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                substitute_dirname(item, engine, import_dir);
            }
        }
        _ => {}
    }
}
