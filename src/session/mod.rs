//! Multi-file sessions.
//!
//! A [`FileGroup`] aggregates opened files into one logical workspace and
//! keeps a flat [`DatasetCatalog`]. The [`Workspace`] owns the format
//! registry and every live FileGroup.

mod catalog;
mod filegroup;
mod workspace;

pub use catalog::{CatalogEntry, DatasetCatalog};
pub use filegroup::{AttachTarget, FileGroup, FileGroupId};
pub use workspace::Workspace;
