use std::path::Path;

use dirshape_core::fs::Directory;
use dirshape_core::{Schema, ViolationKind, dir, file, instantiate, pattern, validate};

fn shape() -> Schema {
    Schema::new()
        .member("some_file", file("some_file.txt"))
        .member(
            "some_dir",
            dir(
                "some_dir",
                Schema::new()
                    .member("some_dir_2", dir("some_dir_2", pattern("*.txt").unwrap()))
                    .member("some_file_2", file("some_file_2"))
                    .rest(pattern("*.txt").unwrap()),
            ),
        )
        .member("some_dir_3", dir("some_dir_3", pattern("*.txt").unwrap()))
        .rest(pattern("rest[0-9]{3}.txt|*.any").unwrap())
}

fn exists_and_is_file(path: &Path) -> (bool, Option<bool>) {
    let exists = path.exists();
    (exists, exists.then(|| path.is_file()))
}

#[test]
fn golden_shape_instance_layout() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    let inst = instantiate(&shape(), root).unwrap();

    assert_eq!(exists_and_is_file(&root.join("some_file.txt")), (true, Some(true)));
    assert_eq!(exists_and_is_file(&root.join("some_dir")), (true, Some(false)));
    assert_eq!(exists_and_is_file(&root.join("some_dir/some_dir_2")), (true, Some(false)));
    assert_eq!(exists_and_is_file(&root.join("some_dir/some_file_2")), (true, Some(true)));
    assert_eq!(exists_and_is_file(&root.join("some_dir_3")), (true, Some(false)));

    assert!(inst.file("some_file").is_some());
    assert!(inst.directory("some_dir_3").is_some());
    let nested = inst.nested("some_dir").unwrap();
    assert_eq!(nested.dir().path(), root.join("some_dir"));
    assert!(nested.directory("some_dir_2").is_some());
    assert!(nested.file("some_file_2").is_some());
}

#[test]
fn golden_shape_on_empty_folder() {
    let tmp = tempfile::tempdir().unwrap();

    let errs = validate(&shape(), tmp.path(), false).unwrap();

    let kinds: Vec<ViolationKind> = errs.iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::FileMissing,
            ViolationKind::DirectoryMissing,
            ViolationKind::DirectoryMissing,
        ]
    );
}

#[test]
fn golden_shape_rest_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let root = Directory::new(tmp.path());

    instantiate(&shape(), root.path()).unwrap();

    root.file("rest100.txt").create(None).unwrap();
    root.file("foo12021bar.any").create(None).unwrap();
    root.dir("some_dir").file("some_thing.txt").create(None).unwrap();

    assert_eq!(validate(&shape(), root.path(), false).unwrap().count(), 0);

    root.file("rest1000.txt").create(None).unwrap();
    root.dir("some_dir").file("some_thing.md").create(None).unwrap();

    let errs = validate(&shape(), root.path(), false).unwrap();
    let paths: Vec<_> = errs.iter().map(|v| v.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            root.path().join("some_dir/some_thing.md"),
            root.path().join("rest1000.txt"),
        ]
    );
}
