//! Opened container files and the format extension point.
//!
//! A [`File`] is the item for one container on disk. What it can decode
//! comes from its [`FileFormat`], picked by extension in the
//! [`FileFactory`]. Tree population is deferred until [`File::read`].

mod factory;

pub use factory::FileFactory;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, ViewerError};
use crate::model::{Dataset, FileId, Group, Item, ItemInfo, Tree};
use crate::session::{DatasetCatalog, FileGroupId};

/// A container format handler registered by file extension.
pub trait FileFormat: fmt::Debug + Send + Sync {
    /// Human readable format name, e.g. `HDF5`.
    fn name(&self) -> &str;

    /// Open the container at `path` read-only.
    fn open(&self, path: &Path) -> Result<Arc<dyn Container>>;
}

/// An opened container resource.
pub trait Container: fmt::Debug {
    /// Mirror the container's root namespace into a [`Group`] tree.
    ///
    /// Every dataset built along the way is recorded in `catalog`.
    fn read_root(&self, file: FileId, catalog: &mut DatasetCatalog) -> Result<Group>;
}

/// One opened container file.
///
/// Clones share the id and the container handle: a clone is the same file.
#[derive(Debug, Clone)]
pub struct File {
    info: ItemInfo,
    fs_path: PathBuf,
    format: Arc<dyn FileFormat>,
    container: Option<Arc<dyn Container>>,
    filegroup: Option<FileGroupId>,
    root: Option<Group>,
    read_error: Option<String>,
}

impl File {
    /// Create an unread file for `path`, handled by `format`.
    pub fn new(path: impl AsRef<Path>, format: Arc<dyn FileFormat>) -> Self {
        let fs_path = absolute_path(path.as_ref());
        let name = fs_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let info = ItemInfo::new(name, fs_path.to_string_lossy().to_string());
        let file = Self {
            info,
            fs_path,
            format,
            container: None,
            filegroup: None,
            root: None,
            read_error: None,
        };
        tracing::info!("Create {} from {}", file, file.fs_path.display());
        file
    }

    /// Absolute filesystem path.
    pub fn fs_path(&self) -> &Path {
        &self.fs_path
    }

    /// Name of the format handling this file.
    pub fn format_name(&self) -> &str {
        self.format.name()
    }

    /// Format handler.
    pub fn format(&self) -> &Arc<dyn FileFormat> {
        &self.format
    }

    /// FileGroup this file is attached to.
    pub fn filegroup(&self) -> Option<FileGroupId> {
        self.filegroup
    }

    pub(crate) fn attach_to_filegroup(&mut self, filegroup: FileGroupId) {
        tracing::info!("Attach {} to FileGroup(\"{}\")", self, filegroup);
        self.filegroup = Some(filegroup);
    }

    pub(crate) fn detach_from_filegroup(&mut self) {
        self.filegroup = None;
    }

    /// Open the container and build the tree.
    ///
    /// The root group is created once; reading an already read file is a
    /// no-op. On failure the file stays without a tree and the reason is
    /// kept in [`File::read_error`].
    pub fn read(&mut self, catalog: &mut DatasetCatalog) -> Result<()> {
        if self.root.is_some() {
            tracing::warn!("{} already read", self);
            return Ok(());
        }

        let result = self.format.open(&self.fs_path).and_then(|container| {
            let root = container.read_root(self.info.id, catalog)?;
            Ok((container, root))
        });

        match result {
            Ok((container, root)) => {
                tracing::debug!(
                    "Read {}: {} groups, {} datasets at top level",
                    self,
                    root.groups().len(),
                    root.datasets().len()
                );
                self.info.attributes = root.attributes().to_vec();
                self.container = Some(container);
                self.root = Some(root);
                self.read_error = None;
                Ok(())
            },
            Err(err) => {
                tracing::error!("Failed to read {}: {}", self, err);
                self.read_error = Some(err.to_string());
                Err(err)
            },
        }
    }

    /// Whether `read()` completed successfully.
    pub fn is_read(&self) -> bool {
        self.root.is_some()
    }

    /// Reason the last `read()` failed.
    pub fn read_error(&self) -> Option<&str> {
        self.read_error.as_deref()
    }

    /// Root group.
    pub fn root(&self) -> Result<&Group> {
        self.root.as_ref().ok_or_else(|| ViewerError::NotRead {
            path: self.fs_path.clone(),
        })
    }

    /// Nested mapping of the root group.
    pub fn get_tree(&self) -> Result<Tree<'_>> {
        Ok(self.root()?.get_tree())
    }

    /// Dataset at container path `path`.
    pub fn dataset(&self, path: &str) -> Option<&Dataset> {
        self.root.as_ref()?.dataset(path)
    }

    /// Drop the tree and release this handle on the container.
    pub fn close(&mut self) {
        if self.container.take().is_some() {
            tracing::debug!("Close {}", self);
        }
        self.root = None;
        self.info.attributes.clear();
    }
}

impl Item for File {
    fn info(&self) -> &ItemInfo {
        &self.info
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}File(\"{}\")", self.format.name(), self.info.id)
    }
}

/// Make `path` absolute against the current directory without touching
/// the filesystem.
pub(crate) fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
