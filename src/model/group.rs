//! Groups: container items holding nested groups and datasets.

use indexmap::IndexMap;

use super::{Dataset, FileId, Item, ItemInfo, Tree, TreeEntry};

/// Borrowed view of one direct child of a group.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// Child group.
    Group(&'a Group),
    /// Child dataset.
    Dataset(&'a Dataset),
}

impl<'a> Node<'a> {
    /// Common item fields of the child.
    pub fn info(&self) -> &'a ItemInfo {
        match *self {
            Node::Group(g) => g.info(),
            Node::Dataset(d) => d.info(),
        }
    }
}

/// A container item.
///
/// Children are kept in the container's enumeration order and are fully
/// populated before the group is handed out.
#[derive(Debug, Clone)]
pub struct Group {
    info: ItemInfo,
    file: FileId,
    groups: Vec<Group>,
    datasets: Vec<Dataset>,
}

impl Group {
    /// Create a group from its already built children.
    pub fn new(info: ItemInfo, file: FileId, groups: Vec<Group>, datasets: Vec<Dataset>) -> Self {
        Self {
            info,
            file,
            groups,
            datasets,
        }
    }

    /// Id of the owning file.
    pub fn file_id(&self) -> FileId {
        self.file
    }

    /// Child groups in container order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Child datasets in container order.
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Whether the group has no children.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.datasets.is_empty()
    }

    /// Direct children by name, groups first. Not recursive.
    pub fn get(&self) -> IndexMap<&str, Node<'_>> {
        let mut map = IndexMap::new();
        for g in &self.groups {
            map.insert(g.name(), Node::Group(g));
        }
        for d in &self.datasets {
            map.insert(d.name(), Node::Dataset(d));
        }
        map
    }

    /// Nested mapping of group names to subtrees and dataset names to leaves.
    ///
    /// A dataset sharing a name with a sibling group replaces it.
    pub fn get_tree(&self) -> Tree<'_> {
        let mut tree = Tree::new();
        for g in &self.groups {
            tree.insert(g.name().to_string(), TreeEntry::Group(g.get_tree()));
        }
        for d in &self.datasets {
            tree.insert(d.name().to_string(), TreeEntry::Dataset(d));
        }
        tree
    }

    /// Resolve a path (absolute or relative to this group) to a descendant.
    pub fn lookup(&self, path: &str) -> Option<Node<'_>> {
        let mut current = self;
        let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
        if segments.peek().is_none() {
            return Some(Node::Group(self));
        }
        while let Some(segment) = segments.next() {
            let last = segments.peek().is_none();
            if let Some(g) = current.groups.iter().find(|g| g.name() == segment) {
                if last {
                    return Some(Node::Group(g));
                }
                current = g;
            } else if last {
                return current
                    .datasets
                    .iter()
                    .find(|d| d.name() == segment)
                    .map(Node::Dataset);
            } else {
                return None;
            }
        }
        None
    }

    /// Resolve a path to a descendant dataset.
    pub fn dataset(&self, path: &str) -> Option<&Dataset> {
        match self.lookup(path)? {
            Node::Dataset(d) => Some(d),
            Node::Group(_) => None,
        }
    }

    /// Visit every dataset below this group, depth first.
    pub fn walk_datasets<'a>(&'a self, visit: &mut dyn FnMut(&'a Dataset)) {
        for d in &self.datasets {
            visit(d);
        }
        for g in &self.groups {
            g.walk_datasets(visit);
        }
    }
}

impl Item for Group {
    fn info(&self) -> &ItemInfo {
        &self.info
    }
}
