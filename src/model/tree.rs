//! Nested name-to-subtree mapping handed to the presentation layer.

use indexmap::IndexMap;

use super::Dataset;

/// Ordered mapping from child name to subtree or leaf.
///
/// Inserting an existing name replaces the earlier entry in place.
pub type Tree<'a> = IndexMap<String, TreeEntry<'a>>;

/// One entry of a [`Tree`].
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEntry<'a> {
    /// A group, expanded into its own mapping.
    Group(Tree<'a>),
    /// A dataset leaf.
    Dataset(&'a Dataset),
}

impl<'a> TreeEntry<'a> {
    /// The subtree, if this is a group.
    pub fn as_group(&self) -> Option<&Tree<'a>> {
        match self {
            TreeEntry::Group(tree) => Some(tree),
            TreeEntry::Dataset(_) => None,
        }
    }

    /// The dataset, if this is a leaf.
    pub fn as_dataset(&self) -> Option<&'a Dataset> {
        match self {
            TreeEntry::Dataset(ds) => Some(ds),
            TreeEntry::Group(_) => None,
        }
    }

    /// Number of dataset leaves below this entry.
    pub fn leaf_count(&self) -> usize {
        match self {
            TreeEntry::Dataset(_) => 1,
            TreeEntry::Group(tree) => tree.values().map(TreeEntry::leaf_count).sum(),
        }
    }
}
