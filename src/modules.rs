//! Module resolution for import specifiers.
//!
//! Turns a module specifier into an absolute file path. Relative and
//! absolute specifiers resolve directly against the importing directory;
//! bare specifiers are searched through `modules/` directories walking from
//! the importing directory toward the filesystem root.

use crate::paths::absolutize;
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Default directory name searched for bare module specifiers.
pub const DEFAULT_SEARCH_DIR: &str = "modules";

/// Host seam turning a module specifier into an absolute file path.
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    /// Resolve `specifier` starting from `base_dir`; fails if unresolvable.
    async fn resolve(&self, specifier: &str, base_dir: &Path) -> Result<PathBuf>;
}

/// Filesystem-backed module resolver.
pub struct FsModuleResolver {
    search_dir: String,
}

impl FsModuleResolver {
    pub fn new() -> Self {
        Self {
            search_dir: DEFAULT_SEARCH_DIR.to_string(),
        }
    }

    /// Override the directory name searched for bare specifiers.
    pub fn with_search_dir(mut self, name: impl Into<String>) -> Self {
        self.search_dir = name.into();
        self
    }
}

impl Default for FsModuleResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModuleResolver for FsModuleResolver {
    async fn resolve(&self, specifier: &str, base_dir: &Path) -> Result<PathBuf> {
        let spec_path = Path::new(specifier);

        // Direct hit relative to the importing directory (or absolute).
        let direct = absolutize(spec_path, base_dir);
        if probe_file(&direct).await {
            return Ok(direct);
        }

        // Bare specifier: walk ancestors probing <ancestor>/<search_dir>/<specifier>.
        if !spec_path.is_absolute() {
            for ancestor in base_dir.ancestors() {
                let candidate = ancestor.join(&self.search_dir).join(spec_path);
                if probe_file(&candidate).await {
                    return Ok(absolutize(&candidate, base_dir));
                }
            }
        }

        bail!(
            "cannot resolve module \"{specifier}\" from {}",
            base_dir.display()
        )
    }
}

/// Existence probe; any I/O failure counts as non-existence.
async fn probe_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_relative_specifier_resolves_against_base_dir() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("fragments/a");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::write(base.join("extra.yml"), "custom: {}").unwrap();

        let resolver = FsModuleResolver::new();
        let resolved = resolver.resolve("extra.yml", &base).await.unwrap();
        assert!(resolved.ends_with("fragments/a/extra.yml"));
    }

    #[tokio::test]
    async fn test_bare_specifier_walks_ancestors() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("fragments/a/deep");
        let module_dir = temp.path().join("modules/shared");
        std::fs::create_dir_all(&base).unwrap();
        std::fs::create_dir_all(&module_dir).unwrap();
        std::fs::write(module_dir.join("serverless.yml"), "custom: {}").unwrap();

        let resolver = FsModuleResolver::new();
        let resolved = resolver
            .resolve("shared/serverless.yml", &base)
            .await
            .unwrap();
        assert!(resolved.ends_with("modules/shared/serverless.yml"));
    }

    #[tokio::test]
    async fn test_unresolvable_specifier_fails() {
        let temp = TempDir::new().unwrap();
        let resolver = FsModuleResolver::new();
        let result = resolver.resolve("missing/serverless.yml", temp.path()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_custom_search_dir() {
        let temp = TempDir::new().unwrap();
        let vendor_dir = temp.path().join("vendor/pkg");
        std::fs::create_dir_all(&vendor_dir).unwrap();
        std::fs::write(vendor_dir.join("serverless.yml"), "custom: {}").unwrap();

        let resolver = FsModuleResolver::new().with_search_dir("vendor");
        let resolved = resolver
            .resolve("pkg/serverless.yml", temp.path())
            .await
            .unwrap();
        assert!(resolved.ends_with("vendor/pkg/serverless.yml"));
    }

    #[tokio::test]
    async fn test_directory_does_not_resolve_as_module() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("fragments/a");
        std::fs::create_dir_all(&dir).unwrap();

        let resolver = FsModuleResolver::new();
        let result = resolver.resolve("fragments/a", temp.path()).await;
        assert!(result.is_err());
    }
}
