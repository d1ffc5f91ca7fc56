//! Handler path rewriting.
//!
//! Function handlers inside a fragment are declared relative to the
//! fragment's own directory; after the merge they must stay valid relative
//! to the project root. Runs before dirname substitution so rewritten
//! handler paths are visible to any downstream placeholder expansion.

use crate::paths::to_forward_slashes;
use serde_json::Value;
use std::path::Path;

/// Re-root every `functions.*.handler` string at the project root.
///
/// `import_dir` is the fragment's directory relative to the project root in
/// forward-slash form. Non-string or absent handlers are left untouched.
/// Mutates the fragment in place.
pub fn rewrite_handlers(fragment: &mut Value, import_dir: &str) {
    let Some(functions) = fragment.get_mut("functions").and_then(Value::as_object_mut) else {
        return;
    };

    for function in functions.values_mut() {
        let Some(handler) = function.get_mut("handler") else {
            continue;
        };
        if let Value::String(path) = handler {
            *path = join_rooted(import_dir, path);
        }
    }
}

fn join_rooted(import_dir: &str, handler: &str) -> String {
    if import_dir.is_empty() {
        return handler.to_string();
    }
    to_forward_slashes(&Path::new(import_dir).join(handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handler_rewritten_relative_to_root() {
        let mut fragment = json!({
            "functions": {
                "hello": {"handler": "src/handler.func"}
            }
        });
        rewrite_handlers(&mut fragment, "fragments/a");
        assert_eq!(
            fragment["functions"]["hello"]["handler"],
            json!("fragments/a/src/handler.func")
        );
    }

    #[test]
    fn test_all_functions_rewritten() {
        let mut fragment = json!({
            "functions": {
                "first": {"handler": "one.func"},
                "second": {"handler": "two.func"}
            }
        });
        rewrite_handlers(&mut fragment, "lib");
        assert_eq!(fragment["functions"]["first"]["handler"], json!("lib/one.func"));
        assert_eq!(fragment["functions"]["second"]["handler"], json!("lib/two.func"));
    }

    #[test]
    fn test_non_string_handler_untouched() {
        let mut fragment = json!({
            "functions": {
                "odd": {"handler": {"inline": true}},
                "bare": {"timeout": 30}
            }
        });
        let before = fragment.clone();
        rewrite_handlers(&mut fragment, "fragments/a");
        assert_eq!(fragment, before);
    }

    #[test]
    fn test_fragment_without_functions_untouched() {
        let mut fragment = json!({"custom": {"foo": 1}});
        let before = fragment.clone();
        rewrite_handlers(&mut fragment, "fragments/a");
        assert_eq!(fragment, before);
    }

    #[test]
    fn test_root_level_fragment_keeps_handler() {
        let mut fragment = json!({
            "functions": {
                "hello": {"handler": "src/handler.func"}
            }
        });
        rewrite_handlers(&mut fragment, "");
        assert_eq!(fragment["functions"]["hello"]["handler"], json!("src/handler.func"));
    }
}
