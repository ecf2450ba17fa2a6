//! JSON files in a data directory

use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, PersistenceResult};
use crate::layout::{ContainerTree, LayoutValidator};
use crate::tracing::span_names;

use super::{LayoutDocument, PersistenceGateway, load_first_valid};

/// Committed layout file name
pub const COMMITTED_FILE: &str = "layout.json";

/// Staged layout file name
pub const STAGED_FILE: &str = "layout.staged.json";

/// Layout gateway backed by `layout.json` and `layout.staged.json`.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    dir: PathBuf,
    validator: LayoutValidator,
}

impl FilePersistence {
    /// Creates a gateway storing its files in `dir`.
    ///
    /// The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, validator: LayoutValidator) -> Self {
        Self {
            dir: dir.into(),
            validator,
        }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the committed layout.
    #[must_use]
    pub fn committed_path(&self) -> PathBuf {
        self.dir.join(COMMITTED_FILE)
    }

    /// Path of the staged layout.
    #[must_use]
    pub fn staged_path(&self) -> PathBuf {
        self.dir.join(STAGED_FILE)
    }

    fn write(&self, path: &Path, tree: &ContainerTree) -> PersistenceResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let json = LayoutDocument::from_tree(tree).to_json()?;
        // readers never see a half-written layout
        let partial = path.with_extension("json.tmp");
        std::fs::write(&partial, json).map_err(|source| PersistenceError::Io {
            path: partial.clone(),
            source,
        })?;
        std::fs::rename(&partial, path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn remove_staged(&self) -> PersistenceResult<()> {
        let path = self.staged_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Io { path, source }),
        }
    }
}

fn read_optional(path: &Path) -> PersistenceResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl PersistenceGateway for FilePersistence {
    fn save_staged(&mut self, tree: &ContainerTree) -> PersistenceResult<()> {
        let _span = crate::trace_operation_debug!(span_names::SAVE_STAGED);
        self.write(&self.staged_path(), tree)
    }

    fn commit(&mut self, tree: &ContainerTree) -> PersistenceResult<()> {
        let _span = crate::trace_operation!(span_names::COMMIT);
        self.write(&self.committed_path(), tree)?;
        self.remove_staged()?;
        tracing::info!(path = %self.committed_path().display(), "Layout committed");
        Ok(())
    }

    fn revert(&mut self) -> PersistenceResult<()> {
        self.remove_staged()
    }

    fn load(&self) -> ContainerTree {
        let staged = self.staged_path();
        let committed = self.committed_path();
        load_first_valid(
            [
                ("staged", read_optional(&staged)),
                ("committed", read_optional(&committed)),
            ],
            &self.validator,
        )
    }

    fn has_staged(&self) -> bool {
        self.staged_path().exists()
    }
}
