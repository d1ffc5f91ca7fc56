//! Path utilities shared by resolution, handler rewriting and dirname
//! substitution.
//!
//! Everything here is pure path/string manipulation (no filesystem I/O):
//! - Component-level normalization of `.` and `..`
//! - Forward-slash rendering regardless of platform
//! - Absolutization against a base directory
//! - Rendering a path relative to the project root

use std::path::{Component, Path, PathBuf};

/// Normalize path components without requiring the file to exist.
/// Handles `.` and `..` components.
pub fn normalize_path_components(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => {
                // Windows drive prefix (e.g., C:)
                components.push(Component::Prefix(p));
            }
            Component::RootDir => {
                components.push(Component::RootDir);
            }
            Component::CurDir => {
                // Skip `.` - it refers to the current directory
            }
            Component::ParentDir => {
                // Go up one directory if possible
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                } else {
                    // Can't go up from root, keep the component
                    components.push(Component::ParentDir);
                }
            }
            Component::Normal(name) => {
                components.push(Component::Normal(name));
            }
        }
    }

    components.iter().collect()
}

/// Convert a path to a string using forward slashes.
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make `path` absolute against `base`, then normalize its components.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize_path_components(&joined)
}

/// Render `path` relative to `root` in forward-slash form.
///
/// Walks the shared component prefix, then backtracks with `..`, so paths
/// outside the root still render. Both inputs are normalized first; equal
/// paths render as the empty string.
pub fn relative_from(root: &Path, path: &Path) -> String {
    let root = normalize_path_components(root);
    let path = normalize_path_components(path);

    let root_components: Vec<Component> = root.components().collect();
    let path_components: Vec<Component> = path.components().collect();

    let shared = root_components
        .iter()
        .zip(path_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..root_components.len() {
        relative.push("..");
    }
    for component in &path_components[shared..] {
        relative.push(component);
    }

    to_forward_slashes(&relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_components() {
        let path = Path::new("/foo/bar/../baz/./qux");
        let normalized = normalize_path_components(path);
        assert_eq!(to_forward_slashes(&normalized), "/foo/baz/qux");
    }

    #[test]
    fn test_normalize_keeps_leading_parent_dirs() {
        let normalized = normalize_path_components(Path::new("../shared/config"));
        assert_eq!(to_forward_slashes(&normalized), "../shared/config");
    }

    #[test]
    fn test_to_forward_slashes() {
        let path = Path::new("foo\\bar\\baz");
        assert_eq!(to_forward_slashes(path), "foo/bar/baz");
    }

    #[test]
    fn test_absolutize_relative_path() {
        let result = absolutize(Path::new("fragments/./a"), Path::new("/srv/app"));
        assert_eq!(to_forward_slashes(&result), "/srv/app/fragments/a");
    }

    #[test]
    fn test_absolutize_keeps_absolute_path() {
        let result = absolutize(Path::new("/etc/service/config"), Path::new("/srv/app"));
        assert_eq!(to_forward_slashes(&result), "/etc/service/config");
    }

    #[test]
    fn test_relative_from_child() {
        let rel = relative_from(Path::new("/srv/app"), Path::new("/srv/app/fragments/a"));
        assert_eq!(rel, "fragments/a");
    }

    #[test]
    fn test_relative_from_same_dir_is_empty() {
        let rel = relative_from(Path::new("/srv/app"), Path::new("/srv/app"));
        assert_eq!(rel, "");
    }

    #[test]
    fn test_relative_from_outside_root_backtracks() {
        let rel = relative_from(Path::new("/srv/app"), Path::new("/srv/shared/common"));
        assert_eq!(rel, "../shared/common");
    }
}
