//! Import walking and activation.
//!
//! [`ImportProcessor`] drives the whole sequence: snapshot the plugin list,
//! recursively resolve/load/rewrite every declared import, fold each
//! fragment into the root document, then hand newly introduced plugins to
//! the host's plugin manager.
//!
//! Sibling declarations are prepared concurrently (resolution, loading and
//! rewriting touch no shared state); their fragments are then recursed into
//! and merged sequentially in declaration order, so merge precedence is
//! deterministic. Recursion advances the base directory to each fragment's
//! own directory, and every branch carries the chain of resolved paths that
//! led to it to detect cycles.

use crate::error::{ImportError, ImportResult};
use crate::loader::{FactoryResolver, StaticFactories, load_fragment};
use crate::merge::merge_into;
use crate::modules::{FsModuleResolver, ModuleResolver};
use crate::paths::{absolutize, relative_from};
use crate::plugins::{PluginManager, PluginSnapshot};
use crate::resolve::PathResolver;
use crate::rewrite::rewrite_handlers;
use crate::types::{ImportDeclaration, declarations_of};
use crate::variables::{BasicVariableEngine, VariableEngine, substitute_dirname};
use futures::future::{BoxFuture, try_join_all};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// A fragment resolved, loaded and rewritten, pending recursion and merge.
struct PreparedFragment {
    path: PathBuf,
    dir: PathBuf,
    document: Value,
}

/// The import engine's activation entry point.
///
/// Construction is side-effect free; the host drives the entire
/// import-and-merge sequence by awaiting [`ImportProcessor::run`].
pub struct ImportProcessor {
    project_root: PathBuf,
    resolver: PathResolver,
    variables: Arc<dyn VariableEngine>,
    modules: Arc<dyn ModuleResolver>,
    factories: Arc<dyn FactoryResolver>,
}

impl ImportProcessor {
    /// Create a processor rooted at the project directory, with default
    /// host seams. A relative root is resolved against the current working
    /// directory.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let project_root = absolutize(&project_root.into(), &cwd);
        Self {
            resolver: PathResolver::new(&project_root),
            variables: Arc::new(BasicVariableEngine::new()),
            modules: Arc::new(FsModuleResolver::new()),
            factories: Arc::new(StaticFactories::new()),
            project_root,
        }
    }

    /// Replace the variable engine seam.
    pub fn with_variables(mut self, engine: Arc<dyn VariableEngine>) -> Self {
        self.variables = engine;
        self
    }

    /// Replace the module resolver seam.
    pub fn with_modules(mut self, modules: Arc<dyn ModuleResolver>) -> Self {
        self.modules = modules;
        self
    }

    /// Replace the factory resolver seam.
    pub fn with_factories(mut self, factories: Arc<dyn FactoryResolver>) -> Self {
        self.factories = factories;
        self
    }

    /// Override the probed config basename.
    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_basename(basename);
        self
    }

    /// Process every import of the root document, then reconcile plugins.
    ///
    /// Each resolved import is logged as `Importing <path>` before loading.
    /// A terminal error is logged and returned; the root may be left
    /// partially merged in that case (whichever earlier siblings already
    /// merged stay merged).
    pub async fn run(
        &self,
        root: &mut Value,
        plugins: &mut dyn PluginManager,
    ) -> ImportResult<()> {
        match self.activate(root, plugins).await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("{err}");
                Err(err)
            }
        }
    }

    async fn activate(
        &self,
        root: &mut Value,
        plugins: &mut dyn PluginManager,
    ) -> ImportResult<()> {
        let snapshot = PluginSnapshot::capture(root);

        let declarations = declarations_of(root);
        self.process_level(declarations, self.project_root.clone(), root, Vec::new())
            .await?;

        let added = snapshot.newly_added(root);
        plugins
            .load_plugins(&added)
            .await
            .map_err(ImportError::Plugin)
    }

    /// Process one nesting level of declarations.
    ///
    /// Preparation fans out across siblings; recursion and merging run in
    /// declaration order. A fragment's nested imports merge into the root
    /// before the fragment itself does.
    fn process_level<'a>(
        &'a self,
        declarations: Vec<ImportDeclaration>,
        base_dir: PathBuf,
        root: &'a mut Value,
        branch: Vec<PathBuf>,
    ) -> BoxFuture<'a, ImportResult<()>> {
        Box::pin(async move {
            if declarations.is_empty() {
                return Ok(());
            }

            let prepared = try_join_all(
                declarations
                    .iter()
                    .map(|declaration| self.prepare(declaration, &base_dir, &branch)),
            )
            .await?;

            for fragment in prepared {
                let mut chain = branch.clone();
                chain.push(fragment.path.clone());

                let nested = declarations_of(&fragment.document);
                self.process_level(nested, fragment.dir.clone(), root, chain)
                    .await?;
                merge_into(root, fragment.document);
            }
            Ok(())
        })
    }

    /// Resolve, load and rewrite one declaration into a merge-ready fragment.
    async fn prepare(
        &self,
        declaration: &ImportDeclaration,
        base_dir: &Path,
        branch: &[PathBuf],
    ) -> ImportResult<PreparedFragment> {
        let raw = self
            .variables
            .resolve_path(declaration.module())
            .await
            .map_err(|source| ImportError::Variables {
                raw: declaration.module().to_string(),
                source,
            })?;

        let path = self
            .resolver
            .resolve(&raw, base_dir, self.modules.as_ref())
            .await?;

        if branch.contains(&path) {
            let mut chain = branch.to_vec();
            chain.push(path.clone());
            return Err(ImportError::Cycle { path, chain });
        }

        info!("Importing {}", path.display());

        let inputs = declaration.inputs();
        let mut document = load_fragment(&path, &inputs, self.factories.as_ref()).await?;

        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let import_dir = relative_from(&self.project_root, &dir);
        rewrite_handlers(&mut document, &import_dir);
        substitute_dirname(&mut document, self.variables.as_ref(), &import_dir);

        Ok(PreparedFragment { path, dir, document })
    }
}
