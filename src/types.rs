//! Core document-model types for the import engine.
//!
//! Documents are plain `serde_json::Value` trees; YAML sources are parsed
//! straight into that shape, so YAML and JSON content merge uniformly.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Recognized config file extensions, in resolution-priority order.
///
/// The enumeration order is load-bearing: directory and module probes try
/// each extension in this order and the first hit wins.
pub const CONFIG_EXTENSIONS: [&str; 3] = ["yml", "yaml", "js"];

/// Extension marking an executable (factory) fragment.
pub const FACTORY_EXTENSION: &str = "js";

/// Default basename probed for directory and bare-specifier imports.
pub const DEFAULT_BASENAME: &str = "serverless";

/// Reserved variable name replaced with the fragment's import directory.
pub const DIRNAME_VARIABLE: &str = "dirname";

/// A single import declaration read from a document's `custom.import` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImportDeclaration {
    /// Bare module or path string.
    Path(String),
    /// Structured record carrying inputs for an executable fragment.
    Detailed {
        module: String,
        #[serde(default)]
        inputs: Map<String, Value>,
    },
}

impl ImportDeclaration {
    /// The module/path string of this declaration.
    pub fn module(&self) -> &str {
        match self {
            ImportDeclaration::Path(module) => module,
            ImportDeclaration::Detailed { module, .. } => module,
        }
    }

    /// Inputs handed to an executable fragment's factory; empty when the
    /// declaration supplied none.
    pub fn inputs(&self) -> Map<String, Value> {
        match self {
            ImportDeclaration::Path(_) => Map::new(),
            ImportDeclaration::Detailed { inputs, .. } => inputs.clone(),
        }
    }
}

/// Read the import declarations of a document.
///
/// `custom.import` may be absent, a single declaration, or an ordered
/// sequence of declarations; absent or empty means zero imports. Entries
/// that are neither strings nor `{module, inputs}` records are ignored.
pub fn declarations_of(document: &Value) -> Vec<ImportDeclaration> {
    let Some(field) = document.get("custom").and_then(|custom| custom.get("import")) else {
        return Vec::new();
    };

    match field {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter_map(parse_declaration).collect(),
        single => parse_declaration(single).into_iter().collect(),
    }
}

fn parse_declaration(value: &Value) -> Option<ImportDeclaration> {
    serde_json::from_value::<ImportDeclaration>(value.clone())
        .ok()
        .filter(|declaration| !declaration.module().is_empty())
}

/// Loading variant of a resolved fragment, tagged by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentSource {
    /// Static structured-data document (`.yml` / `.yaml`).
    Data,
    /// Executable factory producing the document (`.js`).
    Factory,
}

impl FragmentSource {
    /// Variant for a resolved path, decided by its extension.
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext == FACTORY_EXTENSION => FragmentSource::Factory,
            _ => FragmentSource::Data,
        }
    }
}
