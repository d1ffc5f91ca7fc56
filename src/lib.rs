//! Import-resolution-and-merge engine for service configuration documents.
//!
//! A root configuration document may declare imports under `custom.import`:
//! paths or module specifiers pointing at config fragments, optionally with
//! inputs for executable fragments. The engine resolves each declaration to
//! one concrete file, loads it, re-roots its path-relative fields,
//! substitutes the reserved `dirname` variable, recurses into nested
//! imports, deep-merges every fragment into the root document, and finally
//! hands the newly introduced plugins to the host's plugin manager.
//!
//! ```no_run
//! use config_import::{ImportProcessor, plugins::PluginManager};
//! use serde_json::json;
//!
//! # struct NoPlugins;
//! # #[async_trait::async_trait]
//! # impl PluginManager for NoPlugins {
//! #     async fn load_plugins(&mut self, _: &[String]) -> anyhow::Result<()> { Ok(()) }
//! # }
//! # async fn example() -> Result<(), config_import::ImportError> {
//! let mut root = json!({"custom": {"import": "fragments/database"}});
//! let mut plugins = NoPlugins;
//! ImportProcessor::new("/srv/app").run(&mut root, &mut plugins).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;
pub mod merge;
pub mod modules;
pub mod paths;
pub mod plugins;
pub mod resolve;
pub mod rewrite;
pub mod types;
pub mod variables;
pub mod walker;

pub use error::{ImportError, ImportResult};
pub use walker::ImportProcessor;
