//! Process-scoped context: the format registry plus every live FileGroup.

use super::{AttachTarget, FileGroup, FileGroupId};
use crate::error::{Result, ViewerError};
use crate::file::{File, FileFactory};
use crate::model::{FileId, Item};

/// Owns the [`FileFactory`] and the ordered list of live FileGroups.
///
/// Starts empty; [`Workspace::clear`] ends the session.
#[derive(Debug, Default)]
pub struct Workspace {
    factory: FileFactory,
    filegroups: Vec<FileGroup>,
}

impl Workspace {
    /// Create a workspace around a configured registry.
    pub fn new(factory: FileFactory) -> Self {
        Self {
            factory,
            filegroups: Vec::new(),
        }
    }

    /// Workspace with the built-in formats registered.
    pub fn with_default_formats() -> Self {
        Self::new(FileFactory::with_default_formats())
    }

    /// Format registry.
    pub fn factory(&self) -> &FileFactory {
        &self.factory
    }

    /// Format registry, for registering more formats.
    pub fn factory_mut(&mut self) -> &mut FileFactory {
        &mut self.factory
    }

    /// Open a file through the registry without reading it.
    pub fn open_file(&self, path: impl AsRef<std::path::Path>) -> Option<File> {
        self.factory.open_file(path)
    }

    /// Create a FileGroup, register it as live and attach `targets`.
    pub fn create_filegroup<I, T>(&mut self, targets: I) -> FileGroupId
    where
        I: IntoIterator<Item = T>,
        T: Into<AttachTarget>,
    {
        let group = FileGroup::new();
        let id = group.id();
        self.filegroups.push(group);
        for target in targets {
            self.attach_file(id, target);
        }
        id
    }

    /// Live FileGroups in creation order.
    pub fn filegroups(&self) -> &[FileGroup] {
        &self.filegroups
    }

    /// FileGroup by id.
    pub fn filegroup(&self, id: FileGroupId) -> Option<&FileGroup> {
        self.filegroups.iter().find(|g| g.id() == id)
    }

    /// FileGroup by id, mutably.
    ///
    /// Attaching through the returned group only checks that group. Files
    /// that may already live in another group must go through
    /// [`Workspace::attach_file`], which checks every live group.
    pub fn filegroup_mut(&mut self, id: FileGroupId) -> Option<&mut FileGroup> {
        self.filegroups.iter_mut().find(|g| g.id() == id)
    }

    /// FileGroup holding file `id`, if any.
    pub fn owner_of(&self, id: FileId) -> Option<&FileGroup> {
        self.filegroups.iter().find(|g| g.contains_file(id))
    }

    /// Attach to FileGroup `group`, refusing files already attached
    /// anywhere in this workspace.
    pub fn try_attach_file(
        &mut self,
        group: FileGroupId,
        target: impl Into<AttachTarget>,
    ) -> Result<FileId> {
        let target = match target.into() {
            AttachTarget::Path(path) => AttachTarget::File(self.factory.try_open_file(path)?),
            other => other,
        };
        if let AttachTarget::File(file) = &target {
            if let Some(owner) = self.owner_of(file.id()) {
                return Err(ViewerError::AlreadyAttached {
                    file: format!("{} to {}", file, owner),
                });
            }
        }

        let Self {
            factory,
            filegroups,
        } = self;
        let filegroup = filegroups
            .iter_mut()
            .find(|g| g.id() == group)
            .ok_or_else(|| ViewerError::InvalidAttachArgument(format!("FileGroup(\"{}\")", group)))?;
        filegroup.try_attach_file(factory, target)
    }

    /// Like [`try_attach_file`](Self::try_attach_file), but logs the
    /// failure and returns `None`.
    pub fn attach_file(
        &mut self,
        group: FileGroupId,
        target: impl Into<AttachTarget>,
    ) -> Option<FileId> {
        match self.try_attach_file(group, target) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!("{}", err);
                None
            },
        }
    }

    /// Unregister a FileGroup and release its files.
    pub fn close_filegroup(&mut self, id: FileGroupId) -> bool {
        let Some(index) = self.filegroups.iter().position(|g| g.id() == id) else {
            return false;
        };
        let mut group = self.filegroups.remove(index);
        group.close();
        true
    }

    /// Close every FileGroup. The registry is kept.
    pub fn clear(&mut self) {
        tracing::info!("Clear workspace ({} filegroups)", self.filegroups.len());
        for group in &mut self.filegroups {
            group.close();
        }
        self.filegroups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::tests::MemoryFormat;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Workspace) {
        let mut factory = FileFactory::new();
        factory.add_extension("mem", MemoryFormat::shared("MEM")).unwrap();
        (TempDir::new().unwrap(), Workspace::new(factory))
    }

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn filegroups_are_registered_once_in_creation_order() {
        let (dir, mut ws) = setup();
        let a = ws.create_filegroup([touch(&dir, "a.mem"), touch(&dir, "b.mem")]);
        let b = ws.create_filegroup(Vec::<PathBuf>::new());

        let ids: Vec<FileGroupId> = ws.filegroups().iter().map(|g| g.id()).collect();
        assert_eq!(ids, vec![a, b]);

        let first = ws.filegroup(a).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first.get_tree().len(), 2);
        assert!(ws.filegroup(b).unwrap().is_empty());
    }

    #[test]
    fn bad_paths_do_not_abort_the_session() {
        let (dir, mut ws) = setup();
        let id = ws.create_filegroup([
            touch(&dir, "a.mem"),
            dir.path().join("missing.mem"),
            touch(&dir, "c.txt"),
        ]);
        assert_eq!(ws.filegroup(id).unwrap().len(), 1);
    }

    #[test]
    fn file_is_attached_to_one_group_at_a_time() {
        let (dir, mut ws) = setup();
        let file = ws.open_file(touch(&dir, "a.mem")).unwrap();
        let a = ws.create_filegroup([file.clone()]);
        let b = ws.create_filegroup(Vec::<File>::new());

        assert!(matches!(
            ws.try_attach_file(b, file.clone()),
            Err(ViewerError::AlreadyAttached { .. })
        ));
        assert!(ws.attach_file(a, file).is_none());
        assert_eq!(ws.filegroup(a).unwrap().len(), 1);
        assert!(ws.filegroup(b).unwrap().is_empty());
    }

    #[test]
    fn detached_file_moves_between_groups() {
        let (dir, mut ws) = setup();
        let a = ws.create_filegroup([touch(&dir, "a.mem")]);
        let b = ws.create_filegroup(Vec::<PathBuf>::new());
        let file_id = ws.filegroup(a).unwrap().files().values().next().unwrap().id();

        let file = ws.filegroup_mut(a).unwrap().detach_file(file_id).unwrap();
        assert!(ws.owner_of(file_id).is_none());
        assert_eq!(ws.attach_file(b, file), Some(file_id));
        assert_eq!(ws.owner_of(file_id).unwrap().id(), b);
        assert_eq!(ws.filegroup(b).unwrap().catalog().len(), 2);
    }

    #[test]
    fn owner_lookup_follows_back_reference() {
        let (dir, mut ws) = setup();
        let a = ws.create_filegroup(Vec::<PathBuf>::new());
        let file_id = ws.attach_file(a, touch(&dir, "a.mem")).unwrap();
        assert_eq!(ws.owner_of(file_id).unwrap().id(), a);
        let file = ws.filegroup(a).unwrap().file(file_id).unwrap();
        assert_eq!(file.filegroup(), Some(a));
    }

    #[test]
    fn close_and_clear_release_sessions() {
        let (dir, mut ws) = setup();
        let a = ws.create_filegroup([touch(&dir, "a.mem")]);
        let b = ws.create_filegroup([touch(&dir, "b.mem")]);

        assert!(ws.close_filegroup(a));
        assert!(!ws.close_filegroup(a));
        assert_eq!(ws.filegroups().len(), 1);

        ws.clear();
        assert!(ws.filegroups().is_empty());
        assert!(ws.filegroup(b).is_none());
        assert!(ws.factory().format_for("mem").is_some());
    }

    #[test]
    fn unknown_group_is_an_invalid_argument() {
        let (dir, mut ws) = setup();
        let a = ws.create_filegroup(Vec::<PathBuf>::new());
        ws.close_filegroup(a);
        assert!(matches!(
            ws.try_attach_file(a, touch(&dir, "a.mem")),
            Err(ViewerError::InvalidAttachArgument(_))
        ));
    }
}
