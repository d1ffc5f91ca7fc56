//! Fragment loading.
//!
//! A resolved import is one of two variants, tagged by extension:
//! - Data (`.yml` / `.yaml`): read and parsed as a structured document
//! - Factory (`.js`): a host-registered factory invoked with the
//!   declaration's inputs; its return value is the fragment
//!
//! Either way a load failure wraps the underlying cause and names the
//! resolved path.

use crate::error::{ImportError, ImportResult};
use crate::types::FragmentSource;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Boxed factory function producing a fragment from inputs.
pub type FragmentFactory = Box<dyn Fn(&Map<String, Value>) -> Result<Value> + Send + Sync>;

/// Host seam producing documents for factory fragments.
#[async_trait]
pub trait FactoryResolver: Send + Sync {
    /// Invoke the factory behind `path` with `inputs`.
    async fn invoke(&self, path: &Path, inputs: &Map<String, Value>) -> Result<Value>;
}

/// Factory registry keyed by resolved absolute path.
///
/// Suits hosts that compile their executable fragments ahead of time;
/// tests register closures here.
#[derive(Default)]
pub struct StaticFactories {
    factories: HashMap<PathBuf, FragmentFactory>,
}

impl StaticFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a fragment path.
    pub fn register<F>(&mut self, path: impl Into<PathBuf>, factory: F)
    where
        F: Fn(&Map<String, Value>) -> Result<Value> + Send + Sync + 'static,
    {
        self.factories.insert(path.into(), Box::new(factory));
    }
}

#[async_trait]
impl FactoryResolver for StaticFactories {
    async fn invoke(&self, path: &Path, inputs: &Map<String, Value>) -> Result<Value> {
        match self.factories.get(path) {
            Some(factory) => factory(inputs),
            None => bail!("no factory registered for {}", path.display()),
        }
    }
}

/// Load a resolved fragment in its extension-tagged variant.
pub async fn load_fragment(
    path: &Path,
    inputs: &Map<String, Value>,
    factories: &dyn FactoryResolver,
) -> ImportResult<Value> {
    let loaded = match FragmentSource::of(path) {
        FragmentSource::Factory => factories.invoke(path, inputs).await,
        FragmentSource::Data => read_document(path).await,
    };

    loaded.map_err(|source| ImportError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a static data fragment.
async fn read_document(path: &Path) -> Result<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .context("reading config file")?;
    serde_yaml::from_str::<Value>(&content).context("parsing config file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_yaml_fragment() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("serverless.yml");
        std::fs::write(&path, "custom:\n  foo: 1\nplugins:\n  - extra\n").unwrap();

        let fragment = load_fragment(&path, &Map::new(), &StaticFactories::new())
            .await
            .unwrap();
        assert_eq!(fragment["custom"]["foo"], json!(1));
        assert_eq!(fragment["plugins"], json!(["extra"]));
    }

    #[tokio::test]
    async fn test_load_parse_error_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("serverless.yml");
        std::fs::write(&path, "custom: [unbalanced").unwrap();

        let err = load_fragment(&path, &Map::new(), &StaticFactories::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Load { .. }));
        assert!(err.to_string().contains("serverless.yml"));
    }

    #[tokio::test]
    async fn test_factory_fragment_receives_inputs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("serverless.js");
        std::fs::write(&path, "// compiled separately").unwrap();

        let mut factories = StaticFactories::new();
        factories.register(&path, |inputs: &Map<String, Value>| {
            let answer = inputs.get("answer").cloned().unwrap_or(Value::Null);
            Ok(json!({"custom": {"answer": answer}}))
        });

        let mut inputs = Map::new();
        inputs.insert("answer".to_string(), json!(42));
        let fragment = load_fragment(&path, &inputs, &factories).await.unwrap();
        assert_eq!(fragment["custom"]["answer"], json!(42));
    }

    #[tokio::test]
    async fn test_factory_missing_is_load_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("serverless.js");
        std::fs::write(&path, "// no factory registered").unwrap();

        let err = load_fragment(&path, &Map::new(), &StaticFactories::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Load { .. }));
    }

    #[tokio::test]
    async fn test_factory_error_is_load_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("serverless.js");
        std::fs::write(&path, "// factory that fails").unwrap();

        let mut factories = StaticFactories::new();
        factories.register(&path, |_: &Map<String, Value>| -> Result<Value> {
            bail!("boom")
        });

        let err = load_fragment(&path, &Map::new(), &factories).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
