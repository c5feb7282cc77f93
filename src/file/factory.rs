//! Extension-keyed registry of container formats.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{absolute_path, File, FileFormat};
use crate::error::{Result, ViewerError};
use crate::formats::{Hdf5Format, NetcdfFormat};

/// Maps uppercase file extensions to the format that opens them.
///
/// Registration is append-only and the first registration of an extension
/// wins.
#[derive(Debug, Clone, Default)]
pub struct FileFactory {
    file_types: IndexMap<String, Arc<dyn FileFormat>>,
}

impl FileFactory {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in HDF5 and netCDF formats.
    pub fn with_default_formats() -> Self {
        let mut factory = Self::new();
        factory.add_extensions(Hdf5Format::EXTENSIONS, Arc::new(Hdf5Format::new()));
        factory.add_extensions(NetcdfFormat::EXTENSIONS, Arc::new(NetcdfFormat));
        factory
    }

    /// Register `format` for files ending in `.ext` (case-insensitive).
    ///
    /// An already registered extension keeps its format and the call
    /// returns [`ViewerError::DuplicateRegistration`].
    pub fn add_extension(&mut self, ext: &str, format: Arc<dyn FileFormat>) -> Result<()> {
        let ext = normalize(ext);
        if let Some(existing) = self.file_types.get(&ext) {
            let err = ViewerError::DuplicateRegistration {
                extension: ext,
                existing: existing.name().to_string(),
            };
            tracing::warn!("Can not add file type {}: {}", format.name(), err);
            return Err(err);
        }

        tracing::info!("Add extension {} for file type {}", ext, format.name());
        self.file_types.insert(ext, format);
        Ok(())
    }

    /// Register `format` for several extensions. Returns how many were new.
    pub fn add_extensions(&mut self, exts: &[&str], format: Arc<dyn FileFormat>) -> usize {
        exts.iter()
            .filter(|ext| self.add_extension(ext, Arc::clone(&format)).is_ok())
            .count()
    }

    /// Registered extensions, uppercase, in registration order.
    pub fn known_extensions(&self) -> impl Iterator<Item = &str> {
        self.file_types.keys().map(String::as_str)
    }

    /// Format registered for `ext`, if any.
    pub fn format_for(&self, ext: &str) -> Option<&Arc<dyn FileFormat>> {
        self.file_types.get(&normalize(ext))
    }

    /// Create an unread [`File`] for `path`.
    ///
    /// Fails if the path does not exist or its extension is unknown.
    pub fn try_open_file(&self, path: impl AsRef<Path>) -> Result<File> {
        let path = absolute_path(path.as_ref());
        tracing::info!("Open file on path \"{}\"", path.display());

        if !path.exists() {
            return Err(ViewerError::not_found(path));
        }

        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let format = self
            .format_for(&ext)
            .ok_or_else(|| ViewerError::unsupported_format(normalize(&ext)))?;

        Ok(File::new(path, Arc::clone(format)))
    }

    /// Like [`try_open_file`](Self::try_open_file), but logs the failure
    /// and returns `None`.
    pub fn open_file(&self, path: impl AsRef<Path>) -> Option<File> {
        match self.try_open_file(path) {
            Ok(file) => Some(file),
            Err(err) => {
                tracing::warn!("{}", err);
                None
            },
        }
    }
}

fn normalize(ext: &str) -> String {
    ext.trim_start_matches('.').to_uppercase()
}
