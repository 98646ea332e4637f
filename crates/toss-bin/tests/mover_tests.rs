//! Integration tests for the object mover
//!
//! Rename-path and copy-path moves must leave byte-identical content,
//! identical permission bits and identical symlink target strings.

use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use toss_bin::{MoveError, ObjectKind, ObjectMover};
use toss_domain::EntryId;

fn write(path: &Path, content: &str, mode: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

fn mode_of(path: &Path) -> u32 {
    fs::symlink_metadata(path).unwrap().permissions().mode() & 0o7777
}

fn link_target(path: &Path) -> PathBuf {
    let meta = fs::symlink_metadata(path).unwrap();
    assert!(meta.file_type().is_symlink(), "{} is not a symlink", path.display());
    fs::read_link(path).unwrap()
}

/// A directory with a nested file, a same-dir relative link, an absolute
/// dangling link and an executable
fn build_tree(root: &Path) {
    write(&root.join("file.txt"), "file content", 0o640);
    write(&root.join("run.sh"), "#!/bin/sh\n", 0o755);
    write(&root.join("sub").join("nested.txt"), "nested", 0o600);
    symlink("file.txt", root.join("rel-link")).unwrap();
    symlink("/nonexistent/toss/target", root.join("abs-dangling")).unwrap();
    fs::set_permissions(root.join("sub"), fs::Permissions::from_mode(0o750)).unwrap();
}

fn assert_tree(root: &Path) {
    assert_eq!(fs::read_to_string(root.join("file.txt")).unwrap(), "file content");
    assert_eq!(mode_of(&root.join("file.txt")), 0o640);
    assert_eq!(mode_of(&root.join("run.sh")), 0o755);
    assert_eq!(fs::read_to_string(root.join("sub").join("nested.txt")).unwrap(), "nested");
    assert_eq!(mode_of(&root.join("sub").join("nested.txt")), 0o600);
    assert_eq!(mode_of(&root.join("sub")), 0o750);
    assert_eq!(link_target(&root.join("rel-link")), PathBuf::from("file.txt"));
    assert_eq!(
        link_target(&root.join("abs-dangling")),
        PathBuf::from("/nonexistent/toss/target")
    );
}

#[test]
fn test_move_regular_file() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("report.txt");
    write(&src, "0123456789", 0o644);

    let id = EntryId::new();
    let moved = ObjectMover::new()
        .move_into(&src, &dir.path().join("bin"), id)
        .unwrap();

    assert_eq!(moved.kind, ObjectKind::File);
    assert_eq!(moved.size_bytes, 10);
    assert_eq!(moved.bin_name, format!("{}-report.txt", id));
    assert_eq!(moved.destination, dir.path().join("bin").join(&moved.bin_name));
    assert_eq!(moved.original_path, src);
    assert!(!src.exists());
    assert_eq!(fs::read_to_string(&moved.destination).unwrap(), "0123456789");
}

#[test]
fn test_move_missing_source_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = ObjectMover::new().move_into(
        &dir.path().join("ghost.txt"),
        &dir.path().join("bin"),
        EntryId::new(),
    );
    assert!(matches!(result, Err(MoveError::NotFound(_))));
}

#[test]
fn test_move_broken_symlink_is_found() {
    let dir = TempDir::new().unwrap();
    let link = dir.path().join("broken");
    symlink("does-not-exist", &link).unwrap();

    let moved = ObjectMover::new()
        .move_into(&link, &dir.path().join("bin"), EntryId::new())
        .unwrap();

    assert_eq!(moved.kind, ObjectKind::Symlink);
    assert_eq!(link_target(&moved.destination), PathBuf::from("does-not-exist"));
}

#[test]
fn test_move_directory_sums_regular_files() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("project");
    build_tree(&src);

    let moved = ObjectMover::new()
        .move_into(&src, &dir.path().join("bin"), EntryId::new())
        .unwrap();

    assert_eq!(moved.kind, ObjectKind::Directory);
    let expected = ("file content".len() + "#!/bin/sh\n".len() + "nested".len()) as u64;
    assert_eq!(moved.size_bytes, expected);
    assert_tree(&moved.destination);
}

#[test]
fn test_rename_round_trip_preserves_tree() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("project");
    build_tree(&src);

    let mover = ObjectMover::new();
    let moved = mover.move_into(&src, &dir.path().join("bin"), EntryId::new()).unwrap();
    mover.restore_move(&moved.destination, &src).unwrap();

    assert!(!moved.destination.exists());
    assert_tree(&src);
}

#[test]
fn test_forced_copy_round_trip_preserves_tree() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("project");
    build_tree(&src);

    let mover = ObjectMover::copying();
    let moved = mover.move_into(&src, &dir.path().join("bin"), EntryId::new()).unwrap();
    assert!(fs::symlink_metadata(&src).is_err(), "source removed after copy");
    assert_tree(&moved.destination);

    mover.restore_move(&moved.destination, &src).unwrap();
    assert!(fs::symlink_metadata(&moved.destination).is_err());
    assert_tree(&src);
}

#[test]
fn test_forced_copy_keeps_dangling_absolute_symlink() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("links");
    fs::create_dir(&src).unwrap();
    symlink("/absolutely/not/there", src.join("dangling")).unwrap();

    let moved = ObjectMover::copying()
        .move_into(&src, &dir.path().join("bin"), EntryId::new())
        .unwrap();

    assert_eq!(
        link_target(&moved.destination.join("dangling")),
        PathBuf::from("/absolutely/not/there")
    );
}

#[test]
fn test_forced_copy_of_top_level_symlink() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("real.txt");
    write(&target, "real", 0o644);
    let link = dir.path().join("alias");
    symlink(&target, &link).unwrap();

    let moved = ObjectMover::copying()
        .move_into(&link, &dir.path().join("bin"), EntryId::new())
        .unwrap();

    assert_eq!(link_target(&moved.destination), target);
    assert!(fs::symlink_metadata(&link).is_err());
    assert_eq!(fs::read_to_string(&target).unwrap(), "real", "link target untouched");
}

#[test]
fn test_failed_copy_leaves_source_and_partial_destination() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("mixed");
    write(&src.join("a.txt"), "copied first", 0o644);
    // Sockets cannot be copied, so the walk fails after a.txt
    let _listener = UnixListener::bind(src.join("b.sock")).unwrap();

    let result = ObjectMover::copying().move_into(&src, &dir.path().join("bin"), EntryId::new());

    let destination = match result {
        Err(MoveError::CrossVolumeFallbackFailure {
            from, destination, ..
        }) => {
            assert_eq!(from, src);
            destination
        }
        other => panic!("expected CrossVolumeFallbackFailure, got {other:?}"),
    };

    // Source intact
    assert_eq!(fs::read_to_string(src.join("a.txt")).unwrap(), "copied first");
    assert!(fs::symlink_metadata(src.join("b.sock")).is_ok());

    // Destination holds an incomplete copy that the caller must discard
    assert!(destination.join("a.txt").exists());
    assert!(fs::symlink_metadata(destination.join("b.sock")).is_err());
}

#[test]
fn test_restore_recreates_missing_parents() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("deep").join("er").join("notes.txt");
    write(&src, "notes", 0o644);

    let mover = ObjectMover::new();
    let moved = mover.move_into(&src, &dir.path().join("bin"), EntryId::new()).unwrap();
    fs::remove_dir_all(dir.path().join("deep")).unwrap();

    mover.restore_move(&moved.destination, &src).unwrap();
    assert_eq!(fs::read_to_string(&src).unwrap(), "notes");
}

#[test]
fn test_restore_refuses_existing_destination() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("notes.txt");
    write(&src, "old", 0o644);

    let mover = ObjectMover::new();
    let moved = mover.move_into(&src, &dir.path().join("bin"), EntryId::new()).unwrap();
    write(&src, "new", 0o644);

    let result = mover.restore_move(&moved.destination, &src);
    assert!(matches!(result, Err(MoveError::DestinationExists(p)) if p == src));
    assert_eq!(fs::read_to_string(&src).unwrap(), "new");
    assert_eq!(fs::read_to_string(&moved.destination).unwrap(), "old");
}

#[test]
fn test_restore_missing_bin_object_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = ObjectMover::new().restore_move(
        &dir.path().join("bin").join("gone"),
        &dir.path().join("back"),
    );
    assert!(matches!(result, Err(MoveError::NotFound(_))));
}
