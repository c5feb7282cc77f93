mod common;

use common::Fixtures;
use h5gview::{File, Item, ViewerError, Workspace};

#[test]
fn filegroup_aggregates_files_by_name() {
    let fixtures = Fixtures::new();
    let path_a = fixtures.sample_h5("a.h5");
    let path_b = fixtures.flat_h5("b.h5", 5);
    let mut workspace = Workspace::with_default_formats();

    let id = workspace.create_filegroup([&path_a, &path_b]);
    let group = workspace.filegroup(id).unwrap();
    assert_eq!(group.len(), 2);

    let tree = group.get_tree();
    let keys: Vec<&str> = tree.keys().map(String::as_str).collect();
    assert_eq!(keys, ["a.h5", "b.h5"]);

    let b_tree = tree["b.h5"].as_group().unwrap();
    assert_eq!(b_tree["values"].as_dataset().unwrap().shape(), &[5]);

    // 4 datasets from a.h5, 1 from b.h5.
    assert_eq!(group.catalog().len(), 5);
    assert_eq!(group.datasets().count(), 5);
    let found = group.find_datasets("DATASET");
    assert_eq!(found.len(), 2);
}

#[test]
fn missing_path_is_skipped() {
    let fixtures = Fixtures::new();
    let path_a = fixtures.sample_h5("a.h5");
    let missing = fixtures.path("missing.h5");
    let mut workspace = Workspace::with_default_formats();

    let id = workspace.create_filegroup([path_a, missing]);
    let group = workspace.filegroup(id).unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group.get_tree().len(), 1);
}

#[test]
fn unreadable_file_stays_attached_without_tree() {
    let fixtures = Fixtures::new();
    let good = fixtures.sample_h5("good.h5");
    let corrupt = fixtures.garbage("corrupt.h5");
    let mut workspace = Workspace::with_default_formats();

    let id = workspace.create_filegroup([good, corrupt]);
    let group = workspace.filegroup(id).unwrap();
    assert_eq!(group.len(), 2);

    let tree = group.get_tree();
    assert_eq!(tree.len(), 1);
    assert!(tree.contains_key("good.h5"));

    let broken = group.files().values().find(|f| !f.is_read()).unwrap();
    assert_eq!(broken.name(), "corrupt.h5");
    assert!(broken.read_error().is_some());
}

#[test]
fn file_belongs_to_one_filegroup() {
    let fixtures = Fixtures::new();
    let path = fixtures.flat_h5("shared.h5", 3);
    let mut workspace = Workspace::with_default_formats();

    let file: File = workspace.open_file(&path).unwrap();
    let first = workspace.create_filegroup([file.clone()]);
    let second = workspace.create_filegroup(Vec::<File>::new());

    assert!(matches!(
        workspace.try_attach_file(first, file.clone()),
        Err(ViewerError::AlreadyAttached { .. })
    ));
    assert!(matches!(
        workspace.try_attach_file(second, file.clone()),
        Err(ViewerError::AlreadyAttached { .. })
    ));
    assert_eq!(workspace.owner_of(file.id()).unwrap().id(), first);
    assert!(workspace.filegroup(second).unwrap().is_empty());
}

#[test]
fn none_argument_is_rejected() {
    let mut workspace = Workspace::with_default_formats();
    let id = workspace.create_filegroup(Vec::<File>::new());

    let err = workspace.try_attach_file(id, None::<File>).unwrap_err();
    assert!(matches!(err, ViewerError::InvalidAttachArgument(_)));
    assert_eq!(err.to_string(), "Provided file argument None is not compatible");
}

#[test]
fn closing_releases_files() {
    let fixtures = Fixtures::new();
    let path = fixtures.flat_h5("closing.h5", 3);
    let mut workspace = Workspace::with_default_formats();

    let first = workspace.create_filegroup([&path]);
    let second = workspace.create_filegroup([&path]);
    assert_eq!(workspace.filegroups().len(), 2);

    // Opening the same path twice yields two distinct files.
    assert_eq!(workspace.filegroup(second).unwrap().len(), 1);

    assert!(workspace.close_filegroup(first));
    assert!(!workspace.close_filegroup(first));
    assert_eq!(workspace.filegroups().len(), 1);

    workspace.clear();
    assert!(workspace.filegroups().is_empty());
    assert!(workspace.factory().format_for("h5").is_some());
}
