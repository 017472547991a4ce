use crate::areas::config::{Config, LayeredConfig};
use crate::areas::context::{METADATA_DIR, WorkingContext};
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct Repository {
    path: Box<Path>,
    context: WorkingContext,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open (or prepare to create) a repository rooted at `path`
    ///
    /// The root directory is created if it does not exist yet.
    pub fn new(
        path: &Path,
        context: WorkingContext,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory {}", path.display()))?;
        }
        let path = path.canonicalize()?;
        let metadata_path = path.join(METADATA_DIR);

        let index = Index::new(metadata_path.join("index").into_boxed_path());
        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            context,
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
        })
    }

    /// Open the repository enclosing the context's invocation directory
    pub fn discover(
        context: WorkingContext,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let root = context
            .discover_root()
            .ok_or(RepositoryError::NotARepository)?;

        Self::new(&root, context, writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> Box<Path> {
        self.path.join(METADATA_DIR).into_boxed_path()
    }

    pub fn context(&self) -> &WorkingContext {
        &self.context
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Local config layered over the global one, read fresh from disk
    pub fn config(&self) -> anyhow::Result<LayeredConfig> {
        Ok(LayeredConfig::new(
            Config::load(self.metadata_path().join("config").into_boxed_path())?,
            Config::load(self.context.global_config_path().into_boxed_path())?,
        ))
    }
}
