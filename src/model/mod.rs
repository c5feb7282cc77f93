//! Format-agnostic object model.
//!
//! Every container format is decoded into the same tree of items: a
//! [`Group`] holds nested groups and [`Dataset`] leaves, and any item can
//! carry [`Attribute`]s. Structure is built eagerly; dataset payloads stay
//! behind a [`LazyData`] accessor.

mod attribute;
pub(crate) mod dataset;
mod dtype;
mod group;
mod item;
mod tree;

pub use attribute::{AttrValue, Attribute};
pub use dataset::{ArraySource, Dataset, LazyData, PlotKind};
pub use dtype::DType;
pub use group::{Group, Node};
pub use item::{join_path, leaf_name, FileId, Item, ItemId, ItemInfo};
pub use tree::{Tree, TreeEntry};
