//! Aggregation of several opened files into one session.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use uuid::Uuid;

use super::DatasetCatalog;
use crate::error::{Result, ViewerError};
use crate::file::{File, FileFactory};
use crate::model::{Dataset, FileId, Item, Tree, TreeEntry};

/// Session id of a [`FileGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileGroupId(Uuid);

impl FileGroupId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FileGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What can be handed to [`FileGroup::attach_file`].
#[derive(Debug)]
pub enum AttachTarget {
    /// Path to open through the registry.
    Path(PathBuf),
    /// Already opened file.
    File(File),
    /// Nothing usable, e.g. a failed open; carries a description.
    Invalid(String),
}

impl From<File> for AttachTarget {
    fn from(file: File) -> Self {
        AttachTarget::File(file)
    }
}

impl From<Option<File>> for AttachTarget {
    fn from(file: Option<File>) -> Self {
        match file {
            Some(file) => AttachTarget::File(file),
            None => AttachTarget::Invalid("None".to_string()),
        }
    }
}

impl From<PathBuf> for AttachTarget {
    fn from(path: PathBuf) -> Self {
        AttachTarget::Path(path)
    }
}

impl From<&Path> for AttachTarget {
    fn from(path: &Path) -> Self {
        AttachTarget::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for AttachTarget {
    fn from(path: &PathBuf) -> Self {
        AttachTarget::Path(path.clone())
    }
}

impl From<&str> for AttachTarget {
    fn from(path: &str) -> Self {
        AttachTarget::Path(PathBuf::from(path))
    }
}

impl From<String> for AttachTarget {
    fn from(path: String) -> Self {
        AttachTarget::Path(PathBuf::from(path))
    }
}

/// Opened files of one session plus a flat catalogue of their datasets.
///
/// Files are keyed by id, so the same path opened twice is kept twice.
#[derive(Debug)]
pub struct FileGroup {
    id: FileGroupId,
    files: IndexMap<FileId, File>,
    catalog: DatasetCatalog,
}

impl FileGroup {
    /// Create an empty group. Use [`Workspace::create_filegroup`] to have
    /// it registered as a live session.
    ///
    /// [`Workspace::create_filegroup`]: super::Workspace::create_filegroup
    pub(crate) fn new() -> Self {
        let group = Self {
            id: FileGroupId::new(),
            files: IndexMap::new(),
            catalog: DatasetCatalog::new(),
        };
        tracing::info!("Create {}", group);
        group
    }

    /// Session id.
    pub fn id(&self) -> FileGroupId {
        self.id
    }

    /// Attached files by id, in attach order.
    pub fn files(&self) -> &IndexMap<FileId, File> {
        &self.files
    }

    /// Attached file by id.
    pub fn file(&self, id: FileId) -> Option<&File> {
        self.files.get(&id)
    }

    /// Whether `id` is attached here.
    pub fn contains_file(&self, id: FileId) -> bool {
        self.files.contains_key(&id)
    }

    /// Number of attached files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file is attached.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Record a dataset in the flat catalogue.
    pub fn add_dataset(&mut self, dataset: &Dataset) {
        self.catalog.add_dataset(dataset);
    }

    /// The flat catalogue.
    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    /// Catalogued datasets in construction order.
    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> + '_ {
        self.catalog
            .entries()
            .iter()
            .filter_map(|entry| self.files.get(&entry.file)?.dataset(&entry.path))
    }

    /// Datasets whose name or path contains `query`, ignoring case.
    pub fn find_datasets(&self, query: &str) -> Vec<&Dataset> {
        let query = query.to_lowercase();
        self.datasets()
            .filter(|d| {
                d.name().to_lowercase().contains(&query) || d.path().to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Attach a file or a path and read it.
    ///
    /// Paths are opened through `factory`. A file whose id is already
    /// present, or that belongs to another group, is rejected with
    /// [`ViewerError::AlreadyAttached`]. A file whose container fails to
    /// open stays attached without a tree.
    pub fn try_attach_file(
        &mut self,
        factory: &FileFactory,
        target: impl Into<AttachTarget>,
    ) -> Result<FileId> {
        match target.into() {
            AttachTarget::Path(path) => {
                let file = factory.try_open_file(path)?;
                self.try_attach_file(factory, file)
            },
            AttachTarget::Invalid(desc) => Err(ViewerError::InvalidAttachArgument(desc)),
            AttachTarget::File(mut file) => {
                let id = file.id();
                if self.files.contains_key(&id) {
                    return Err(ViewerError::AlreadyAttached {
                        file: format!("{} to {}", file, self),
                    });
                }
                if let Some(other) = file.filegroup() {
                    if other != self.id {
                        return Err(ViewerError::AlreadyAttached {
                            file: format!("{} to FileGroup(\"{}\")", file, other),
                        });
                    }
                }

                file.attach_to_filegroup(self.id);
                if let Ok(root) = file.root() {
                    // Detached files come back with their tree; recatalogue it.
                    tracing::debug!("{} already read, recatalogue its datasets", file);
                    root.walk_datasets(&mut |d| self.add_dataset(d));
                    self.files.insert(id, file);
                    return Ok(id);
                }

                let file = self.files.entry(id).or_insert(file);
                if let Err(err) = file.read(&mut self.catalog) {
                    tracing::error!("{} attached without a tree: {}", file, err);
                }
                Ok(id)
            },
        }
    }

    /// Like [`try_attach_file`](Self::try_attach_file), but logs the
    /// failure and returns `None`.
    pub fn attach_file(
        &mut self,
        factory: &FileFactory,
        target: impl Into<AttachTarget>,
    ) -> Option<FileId> {
        match self.try_attach_file(factory, target) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!("{}", err);
                None
            },
        }
    }

    /// Remove a file, its catalogue entries and its back-reference.
    pub fn detach_file(&mut self, id: FileId) -> Option<File> {
        let mut file = self.files.shift_remove(&id)?;
        self.catalog.remove_file(id);
        file.detach_from_filegroup();
        tracing::info!("Detach {} from {}", file, self);
        Some(file)
    }

    /// Release every attached file.
    pub(crate) fn close(&mut self) {
        tracing::info!("Close {} ({} files)", self, self.files.len());
        for (_, mut file) in self.files.drain(..) {
            file.detach_from_filegroup();
            file.close();
        }
        self.catalog = DatasetCatalog::new();
    }

    /// Map every readable file's display name to its tree.
    ///
    /// Files sharing a display name shadow each other; unreadable files
    /// are left out.
    pub fn get_tree(&self) -> Tree<'_> {
        let mut toplevel = Tree::new();
        for file in self.files.values() {
            match file.get_tree() {
                Ok(tree) => {
                    toplevel.insert(file.name().to_string(), TreeEntry::Group(tree));
                },
                Err(err) => tracing::debug!("Skip {} in tree: {}", file, err),
            }
        }
        toplevel
    }
}

impl fmt::Display for FileGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileGroup(\"{}\")", self.id)
    }
}
