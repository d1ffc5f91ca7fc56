//! Import path resolution.
//!
//! Turns a raw import string into one concrete, existing file, trying in
//! order:
//! 1. A literal config file (recognized extension) relative to the
//!    invocation directory, falling back to module resolution
//! 2. An existing directory, probed for `<basename>.<ext>` per extension
//! 3. Module resolution of `<raw>/<basename>.<ext>` per extension
//!
//! Failed candidates are collected in attempt order and surfaced in the
//! resolution error. I/O failures during probing (permissions included)
//! count as non-existence; only the final error is visible.

use crate::error::{ImportError, ImportResult};
use crate::modules::ModuleResolver;
use crate::paths::absolutize;
use crate::types::{CONFIG_EXTENSIONS, DEFAULT_BASENAME};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves raw import strings to concrete existing files.
pub struct PathResolver {
    invocation_dir: PathBuf,
    basename: String,
}

impl PathResolver {
    /// Create a resolver rooted at the process invocation directory.
    pub fn new(invocation_dir: impl Into<PathBuf>) -> Self {
        Self {
            invocation_dir: invocation_dir.into(),
            basename: DEFAULT_BASENAME.to_string(),
        }
    }

    /// Override the probed config basename.
    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    /// Resolve `raw` to an absolute existing file path.
    ///
    /// `base_dir` is the directory the declaring document lives in; module
    /// resolution starts there, literal and directory probes are rooted at
    /// the invocation directory.
    pub async fn resolve(
        &self,
        raw: &str,
        base_dir: &Path,
        modules: &dyn ModuleResolver,
    ) -> ImportResult<PathBuf> {
        let mut attempted: Vec<String> = Vec::new();

        // 1. Recognized extension: literal file, then module resolution.
        if has_config_extension(raw) {
            let literal = absolutize(Path::new(raw), &self.invocation_dir);
            if probe_file(&literal).await {
                return Ok(literal);
            }
            attempted.push(literal.display().to_string());

            match modules.resolve(raw, base_dir).await {
                Ok(path) => return Ok(path),
                Err(err) => {
                    debug!("module resolution of {raw} failed: {err:#}");
                    attempted.push(raw.to_string());
                }
            }
            return Err(self.unresolved(raw, attempted));
        }

        // 2. Existing directory: probe <dir>/<basename>.<ext> in order.
        let dir = absolutize(Path::new(raw), &self.invocation_dir);
        if probe_dir(&dir).await {
            for ext in CONFIG_EXTENSIONS {
                let candidate = dir.join(format!("{}.{ext}", self.basename));
                if probe_file(&candidate).await {
                    return Ok(candidate);
                }
                attempted.push(candidate.display().to_string());
            }
            return Err(self.unresolved(raw, attempted));
        }

        // 3. Bare specifier: module resolution of <raw>/<basename>.<ext>.
        for ext in CONFIG_EXTENSIONS {
            let specifier = format!("{raw}/{}.{ext}", self.basename);
            match modules.resolve(&specifier, base_dir).await {
                Ok(path) => return Ok(path),
                Err(err) => {
                    debug!("module resolution of {specifier} failed: {err:#}");
                    attempted.push(specifier);
                }
            }
        }
        Err(self.unresolved(raw, attempted))
    }

    fn unresolved(&self, raw: &str, attempted: Vec<String>) -> ImportError {
        ImportError::Resolution {
            raw: raw.to_string(),
            attempted,
        }
    }
}

/// Whether the raw path ends in a recognized config extension.
fn has_config_extension(raw: &str) -> bool {
    Path::new(raw)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CONFIG_EXTENSIONS.contains(&ext))
}

/// Existence probe; any I/O failure counts as non-existence.
async fn probe_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn probe_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}
