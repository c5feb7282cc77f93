//! Flat catalogue of every dataset seen by a FileGroup.

use crate::model::{Dataset, FileId, Item, ItemId};

/// Non-owning reference to a dataset inside one of the group's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Owning file.
    pub file: FileId,
    /// Dataset id.
    pub dataset: ItemId,
    /// Container path of the dataset.
    pub path: String,
}

/// Datasets in the order they were constructed.
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    entries: Vec<CatalogEntry>,
}

impl DatasetCatalog {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly built dataset.
    pub fn add_dataset(&mut self, dataset: &Dataset) {
        tracing::trace!("Catalogue {} of file {}", dataset.path(), dataset.file_id());
        self.entries.push(CatalogEntry {
            file: dataset.file_id(),
            dataset: dataset.id(),
            path: dataset.path().to_string(),
        });
    }

    /// All entries.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the dataset id is recorded.
    pub fn contains(&self, dataset: ItemId) -> bool {
        self.entries.iter().any(|e| e.dataset == dataset)
    }

    /// Drop every entry belonging to `file`.
    pub fn remove_file(&mut self, file: FileId) {
        self.entries.retain(|e| e.file != file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dataset::tests::ramp_dataset_in;

    #[test]
    fn records_and_removes_by_file() {
        let f1 = FileId::new();
        let f2 = FileId::new();
        let a = ramp_dataset_in(f1, "/a", vec![2]);
        let b = ramp_dataset_in(f2, "/b", vec![2]);

        let mut catalog = DatasetCatalog::new();
        catalog.add_dataset(&a);
        catalog.add_dataset(&b);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(a.id()));
        assert_eq!(catalog.entries()[1].path, "/b");

        catalog.remove_file(f1);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains(a.id()));
        assert!(catalog.contains(b.id()));
    }
}
