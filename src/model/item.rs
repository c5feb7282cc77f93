//! Identity and common fields shared by every tree item.

use std::fmt;

use uuid::Uuid;

use super::Attribute;

/// Process-unique identifier of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Id of a [`File`](crate::File). Files are items, so this is the same id space.
pub type FileId = ItemId;

/// Fields common to files, groups and datasets.
#[derive(Debug, Clone)]
pub struct ItemInfo {
    /// Generated at construction, never changes.
    pub id: ItemId,
    /// Last path segment.
    pub name: String,
    /// Full path from the container root.
    pub path: String,
    /// Metadata attached to the item, in container order.
    pub attributes: Vec<Attribute>,
}

impl ItemInfo {
    /// Create item fields with a fresh id and no attributes.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            path: path.into(),
            attributes: Vec::new(),
        }
    }

    /// Derive the item fields from a container path such as `/a/b/c`.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = leaf_name(&path).to_string();
        Self::new(name, path)
    }
}

/// Named, identified, attributable entity of the tree.
pub trait Item {
    /// Common item fields.
    fn info(&self) -> &ItemInfo;

    /// Unique id.
    fn id(&self) -> ItemId {
        self.info().id
    }

    /// Last path segment.
    fn name(&self) -> &str {
        &self.info().name
    }

    /// Full hierarchical path.
    fn path(&self) -> &str {
        &self.info().path
    }

    /// Attached attributes.
    fn attributes(&self) -> &[Attribute] {
        &self.info().attributes
    }

    /// Look up an attribute by name. The first match wins.
    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().iter().find(|a| a.name == name)
    }
}

/// Last `/`-separated segment of a container path. The root (`/`) yields `""`.
pub fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// Join a parent container path and a child name.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = ItemInfo::new("a", "/a");
        let b = ItemInfo::new("a", "/a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn name_is_last_segment() {
        assert_eq!(leaf_name("/groupA/dataset1"), "dataset1");
        assert_eq!(leaf_name("/"), "");
        assert_eq!(ItemInfo::from_path("/groupA").name, "groupA");
    }

    #[test]
    fn join_handles_root() {
        assert_eq!(join_path("/", "a"), "/a");
        assert_eq!(join_path("", "a"), "/a");
        assert_eq!(join_path("/a", "b"), "/a/b");
    }
}
