//! Error types for h5gview.
//!
//! This module provides a unified error handling approach using `thiserror`.
//! Most of these conditions are recovered where they are detected: the
//! lenient entry points log them and hand back an empty result.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for h5gview operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Errors that can occur while opening, reading or aggregating container files.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Path does not exist on the filesystem.
    #[error("File does not exist: {path}")]
    NotFound {
        /// Absolute path that was looked up.
        path: PathBuf,
    },

    /// No handler is registered for the file extension.
    #[error("Unknown file extension \"{extension}\"")]
    UnsupportedFormat {
        /// Uppercased extension.
        extension: String,
    },

    /// Extension is already registered; the first handler is kept.
    #[error("Extension {extension} already registered for {existing}")]
    DuplicateRegistration {
        /// Uppercased extension.
        extension: String,
        /// Name of the format that keeps the extension.
        existing: String,
    },

    /// File id is already present in a FileGroup.
    #[error("{file} already attached")]
    AlreadyAttached {
        /// Display form of the file.
        file: String,
    },

    /// Attach argument is neither a path nor a File.
    #[error("Provided file argument {0} is not compatible")]
    InvalidAttachArgument(String),

    /// The underlying container could not be opened.
    #[error("Failed to open container {path}: {reason}")]
    ContainerOpen {
        /// Absolute path of the container.
        path: PathBuf,
        /// Backend message.
        reason: String,
    },

    /// Tree access on a File whose `read()` has not completed.
    #[error("File has no tree (not read or unreadable): {path}")]
    NotRead {
        /// Absolute path of the container.
        path: PathBuf,
    },

    /// Dataset payload could not be fetched.
    #[error("Failed to read data at {path}: {reason}")]
    DataRead {
        /// Internal container path of the dataset.
        path: String,
        /// Backend message.
        reason: String,
    },

    /// Failed to read HDF5 file.
    #[error("HDF5 error: {0}")]
    Hdf5(String),

    /// Failed to read NetCDF file.
    #[error("NetCDF error: {0}")]
    NetCDF(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload did not fit the advertised shape.
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl ViewerError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Create a ContainerOpen error.
    pub fn container_open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ContainerOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a DataRead error.
    pub fn data_read(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<hdf5::Error> for ViewerError {
    fn from(err: hdf5::Error) -> Self {
        Self::Hdf5(err.to_string())
    }
}

impl From<netcdf::Error> for ViewerError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCDF(err.to_string())
    }
}
