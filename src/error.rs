//! Error taxonomy for the import engine.
//!
//! Every variant is fatal to the whole activation: nothing is retried and
//! nothing is downgraded to a warning. Causes from host seams arrive as
//! `anyhow::Error` and are preserved as sources.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for import operations.
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Errors raised while resolving, loading and merging config imports.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No candidate path or module exists for a declared import.
    ///
    /// `attempted` holds every candidate in attempt order; the message
    /// enumerates them all to aid diagnosis.
    #[error("config import \"{raw}\" doesn't exist (attempted: {})", .attempted.join(", "))]
    Resolution {
        raw: String,
        attempted: Vec<String>,
    },

    /// A resolved file could not be read or parsed, or its factory failed.
    #[error("failed to load config import {}: {source:#}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// An import chain resolved back into a file already on the chain.
    #[error("cyclic config import {}: {}", .path.display(), format_chain(.chain))]
    Cycle {
        path: PathBuf,
        chain: Vec<PathBuf>,
    },

    /// The host variable engine failed while expanding an import path.
    #[error("failed to expand variables in import \"{raw}\": {source:#}")]
    Variables {
        raw: String,
        #[source]
        source: anyhow::Error,
    },

    /// The host plugin manager rejected the newly introduced plugins.
    #[error("failed to load plugins introduced by imports: {0:#}")]
    Plugin(#[source] anyhow::Error),
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
