//! Plugin reconciliation.
//!
//! Merged fragments may append to the root document's `plugins` list. The
//! host's plugin manager only needs the entries that imports introduced, so
//! the list is snapshotted before any import runs and diffed exactly once
//! after all imports settle.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Host seam loading plugin instances by identifier.
#[async_trait]
pub trait PluginManager: Send + Sync {
    /// Load the given plugins, in order.
    async fn load_plugins(&mut self, names: &[String]) -> Result<()>;
}

/// Ordered plugin identifiers captured before any import ran.
///
/// An explicit immutable baseline: captured once, read once for the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSnapshot(Vec<String>);

impl PluginSnapshot {
    /// Capture the current `plugins` list of a document.
    pub fn capture(document: &Value) -> Self {
        Self(plugin_list(document))
    }

    /// Plugins present now but not at capture time, preserving current
    /// order, without introducing duplicates.
    pub fn newly_added(&self, document: &Value) -> Vec<String> {
        let mut added = Vec::new();
        for name in plugin_list(document) {
            if !self.0.contains(&name) && !added.contains(&name) {
                added.push(name);
            }
        }
        added
    }
}

/// String entries of a document's top-level `plugins` sequence.
fn plugin_list(document: &Value) -> Vec<String> {
    document
        .get("plugins")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
