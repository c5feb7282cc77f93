//! h5gview - the data core of a hierarchical scientific data viewer.
//!
//! h5gview turns container files (HDF5, netCDF) into a format-agnostic tree of
//! groups, datasets and attributes, and aggregates several files into one
//! browsable workspace.
//!
//! # Features
//!
//! - Uniform item model: every node has an id, a name, a path and attributes
//! - Extension-keyed format registry with pluggable handlers
//! - Lazy dataset payloads, loaded on demand as `f64` arrays
//! - Multi-file [`FileGroup`]s with a flat dataset catalogue
//!
//! # Example
//!
//! ```ignore
//! use h5gview::Workspace;
//!
//! let mut workspace = Workspace::with_default_formats();
//! let group = workspace.create_filegroup(["a.h5", "b.h5"]);
//!
//! let tree = workspace.filegroup(group).unwrap().get_tree();
//! for (file_name, entry) in &tree {
//!     println!("{file_name}: {} datasets", entry.leaf_count());
//! }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod error;
pub mod file;
pub mod formats;
pub mod model;
pub mod session;

pub use error::{Result, ViewerError};
pub use file::{Container, File, FileFactory, FileFormat};
pub use model::{
    AttrValue, Attribute, DType, Dataset, FileId, Group, Item, ItemId, LazyData, PlotKind, Tree,
    TreeEntry,
};
pub use session::{AttachTarget, DatasetCatalog, FileGroup, FileGroupId, Workspace};
