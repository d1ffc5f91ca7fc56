//! Deep merge primitive for configuration documents.
//!
//! Fragments fold into the root document field-by-field:
//! - Objects merge recursively: keys in the source override keys in the target
//! - Arrays concatenate, target elements first
//! - Scalars are overwritten by the source value
//! - A null source value leaves the target untouched (null means "not specified")

use serde_json::Value;

/// Deep-merge `source` into `target` in place.
///
/// # Example
/// ```
/// use serde_json::json;
/// use config_import::merge::merge_into;
///
/// let mut target = json!({
///     "provider": { "region": "eu-west-1", "stage": "dev" },
///     "plugins": ["alpha"]
/// });
/// merge_into(&mut target, json!({
///     "provider": { "stage": "prod" },
///     "plugins": ["beta"]
/// }));
/// // target: { "provider": { "region": "eu-west-1", "stage": "prod" },
/// //           "plugins": ["alpha", "beta"] }
/// ```
pub fn merge_into(target: &mut Value, source: Value) {
    match (target, source) {
        // Both are objects: merge recursively
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, source_value) in source_map {
                match target_map.get_mut(&key) {
                    Some(target_value) => merge_into(target_value, source_value),
                    None => {
                        target_map.insert(key, source_value);
                    }
                }
            }
        }
        // Both are arrays: concatenate
        (Value::Array(target_items), Value::Array(source_items)) => {
            target_items.extend(source_items);
        }
        // Source is null: preserve target
        (_, Value::Null) => {}
        // Any other case: source replaces target entirely
        (target_slot, source) => *target_slot = source,
    }
}
