use std::fs;
use std::io;

use takeout_reorg::error::ReorgError;

use super::support::Fixture;

#[test]
fn test_missing_photo_root_fails() {
    let fx = Fixture::without_archive();
    fs::remove_dir(fx.photo_root()).unwrap();

    match fx.run() {
        Err(ReorgError::ReadDir { path, source }) => {
            assert_eq!(path, fx.photo_root());
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("Expected ReadDir error, got {:?}", other),
    }
    // Nothing was created before the failure
    assert!(!fx.out("Photos").exists());
}

#[test]
fn test_missing_archive_aborts_after_main_pass() {
    let fx = Fixture::without_archive();
    fx.add("Photos from 2020/a.jpg", b"alpha");
    fx.add("Trip/b.jpg", b"bravo");

    match fx.run() {
        Err(ReorgError::ReadDir { path, .. }) => {
            assert_eq!(path, fx.photo_root().join("Archive"));
        }
        other => panic!("Expected ReadDir error, got {:?}", other),
    }

    // No rollback: the main pass already moved its photo
    assert!(fx.out("Photos/a.jpg").exists());
    // The album pass never ran
    assert!(!fx.out("Albums").exists());
    assert!(fx.photo_root().join("Trip/b.jpg").exists());
}

#[cfg(unix)]
#[test]
fn test_unreadable_photo_aborts_with_hash_error() {
    let fx = Fixture::new();
    fx.add("Photos from 2020/a.jpg", b"alpha");
    let dangling = fx.photo_root().join("Photos from 2020/b.jpg");
    std::os::unix::fs::symlink(fx.source.path().join("nowhere.jpg"), &dangling).unwrap();

    match fx.run() {
        Err(ReorgError::Hash { path, source }) => {
            assert_eq!(path, dangling);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("Expected Hash error, got {:?}", other),
    }
    assert!(fx.out("Photos/a.jpg").exists());
}

#[cfg(unix)]
#[test]
fn test_existing_album_entry_aborts_with_symlink_error() {
    let fx = Fixture::new();
    fx.add("Trip/a.jpg", b"alpha");
    fs::create_dir_all(fx.out("Albums/Trip")).unwrap();
    fs::write(fx.out("Albums/Trip/a.jpg"), b"in the way").unwrap();

    match fx.run() {
        Err(ReorgError::Symlink { link, source, .. }) => {
            assert_eq!(link, fx.out("Albums/Trip/a.jpg"));
            assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
        }
        other => panic!("Expected Symlink error, got {:?}", other),
    }
    // The member was materialized before the link failed
    assert!(fx.out("Album-only Photos/a.jpg").exists());
}

#[test]
fn test_target_dir_blocked_by_file() {
    let fx = Fixture::new();
    fx.add("Photos from 2020/a.jpg", b"alpha");
    fs::write(fx.out("Photos"), b"not a directory").unwrap();

    match fx.run() {
        Err(ReorgError::CreateDir { path, .. }) => {
            assert_eq!(path, fx.out("Photos"));
        }
        other => panic!("Expected CreateDir error, got {:?}", other),
    }
    assert!(fx.photo_root().join("Photos from 2020/a.jpg").exists());
}

#[test]
fn test_error_message_names_path() {
    let fx = Fixture::without_archive();

    let err = fx.run().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("failed to read directory "));
    assert!(message.contains("Archive"));
}
