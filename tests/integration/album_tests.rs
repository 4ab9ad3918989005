#![cfg(unix)]

use std::fs;
use std::path::Path;

use takeout_reorg::reorg::{collision_path, PhotoIndex, Tier};

use super::support::{assert_links_to, fingerprint_of, names_in, Fixture};

/// Every entry under `Albums/` is a symlink to a real file outside it.
fn assert_albums_only_hold_links(albums: &Path) {
    let albums = fs::canonicalize(albums).unwrap();
    for album in fs::read_dir(&albums).unwrap() {
        let album = album.unwrap();
        assert!(album.file_type().unwrap().is_dir());
        for member in fs::read_dir(album.path()).unwrap() {
            let member = member.unwrap();
            assert!(
                member.file_type().unwrap().is_symlink(),
                "{} is not a symlink",
                member.path().display()
            );
            let resolved = fs::canonicalize(member.path()).unwrap();
            assert!(resolved.is_file());
            assert!(!resolved.starts_with(&albums));
        }
    }
}

#[test]
fn test_album_copy_of_main_photo_links_to_photos() {
    let fx = Fixture::new();
    fx.add("Photos from 2020/a.jpg", b"content X");
    let album_copy = fx.add("AlbumFoo/a.jpg", b"content X");

    let summary = fx.run().unwrap();

    assert_eq!(fs::read(fx.out("Photos/a.jpg")).unwrap(), b"content X");
    assert_links_to(&fx.out("Albums/AlbumFoo/a.jpg"), &fx.out("Photos/a.jpg"));
    assert!(names_in(&fx.out("Album-only Photos")).is_empty());
    // The album copy is left behind in the source
    assert!(album_copy.exists());
    assert_eq!(summary.album_links, 1);
    assert_eq!(summary.album_only_photos, 0);
}

#[test]
fn test_album_only_photo_materialized() {
    let fx = Fixture::new();
    let member = fx.add("AlbumBar/b.jpg", b"content Y");

    let mut index = PhotoIndex::new();
    let summary = fx.run_with_index(&mut index).unwrap();

    assert!(!member.exists());
    assert_eq!(
        fs::read(fx.out("Album-only Photos/b.jpg")).unwrap(),
        b"content Y"
    );
    assert_links_to(
        &fx.out("Albums/AlbumBar/b.jpg"),
        &fx.out("Album-only Photos/b.jpg"),
    );
    assert_eq!(
        index.get(&fingerprint_of(b"content Y")).unwrap().tier,
        Tier::AlbumOnly
    );
    assert_eq!(summary.album_only_photos, 1);
}

#[test]
fn test_link_target_is_relative_to_album_dir() {
    let fx = Fixture::new();
    fx.add("Photos from 2020/a.jpg", b"x");
    fx.add("Trip/a.jpg", b"x");

    fx.run().unwrap();

    assert_eq!(
        fs::read_link(fx.out("Albums/Trip/a.jpg")).unwrap(),
        Path::new("../../Photos/a.jpg")
    );
}

#[test]
fn test_archived_photo_in_album_links_to_archive() {
    let fx = Fixture::new();
    fx.add("Archive/old.jpg", b"archived");
    fx.add("Memories/old.jpg", b"archived");

    fx.run().unwrap();

    assert_links_to(&fx.out("Albums/Memories/old.jpg"), &fx.out("Archive/old.jpg"));
    assert!(names_in(&fx.out("Album-only Photos")).is_empty());
}

#[test]
fn test_main_photo_wins_over_archive_for_album_links() {
    let fx = Fixture::new();
    fx.add("Photos from 2021/p.jpg", b"both");
    fx.add("Archive/p.jpg", b"both");
    fx.add("Trip/p.jpg", b"both");

    fx.run().unwrap();

    assert!(fx.out("Archive/p.jpg").is_file());
    assert_links_to(&fx.out("Albums/Trip/p.jpg"), &fx.out("Photos/p.jpg"));
}

#[test]
fn test_shared_album_only_content_materialized_once() {
    let fx = Fixture::new();
    fx.add("Album A/x.jpg", b"only in albums");
    let second = fx.add("Album B/renamed.jpg", b"only in albums");

    let summary = fx.run().unwrap();

    assert_eq!(names_in(&fx.out("Album-only Photos")), vec!["x.jpg"]);
    assert_links_to(&fx.out("Albums/Album A/x.jpg"), &fx.out("Album-only Photos/x.jpg"));
    assert_links_to(
        &fx.out("Albums/Album B/renamed.jpg"),
        &fx.out("Album-only Photos/x.jpg"),
    );
    assert!(second.exists());
    assert_eq!(summary.album_only_photos, 1);
    assert_eq!(summary.album_links, 2);
    assert_eq!(summary.albums, 2);
}

#[test]
fn test_album_only_name_collision_renamed() {
    let fx = Fixture::new();
    fx.add("Album A/x.jpg", b"P");
    fx.add("Album B/x.jpg", b"Q");

    let summary = fx.run().unwrap();

    let renamed = collision_path(&fx.out("Album-only Photos/x.jpg"), &fingerprint_of(b"Q"));
    assert_eq!(fs::read(fx.out("Album-only Photos/x.jpg")).unwrap(), b"P");
    assert_eq!(fs::read(&renamed).unwrap(), b"Q");
    assert_links_to(&fx.out("Albums/Album B/x.jpg"), &renamed);
    assert_eq!(summary.collision_renames, 1);
}

#[test]
fn test_album_sidecars_not_linked() {
    let fx = Fixture::new();
    fx.add("Trip/a.jpg", b"a");
    let meta = fx.add("Trip/metadata.json", b"{}");

    let summary = fx.run().unwrap();

    assert_eq!(names_in(&fx.out("Albums/Trip")), vec!["a.jpg"]);
    assert!(meta.exists());
    assert_eq!(summary.skipped_sidecars, 1);
}

#[test]
fn test_empty_album_still_gets_directory() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.photo_root().join("Empty")).unwrap();

    let summary = fx.run().unwrap();

    assert!(fx.out("Albums/Empty").is_dir());
    assert_eq!(summary.albums, 1);
}

#[test]
fn test_albums_hold_only_resolving_symlinks() {
    let fx = Fixture::new();
    fx.add("Photos from 2019/a.jpg", b"a");
    fx.add("Photos from 2020/b.jpg", b"b");
    fx.add("Archive/c.jpg", b"c");
    fx.add("Trip/a.jpg", b"a");
    fx.add("Trip/c.jpg", b"c");
    fx.add("Trip/d.jpg", b"d");
    fx.add("Friends/b.jpg", b"b");
    fx.add("Friends/d.jpg", b"d");
    fx.add("Friends/e.jpg", b"e");

    let summary = fx.run().unwrap();

    assert_albums_only_hold_links(&fx.out("Albums"));
    assert_eq!(summary.album_links, 6);
    // d and e are the only contents with no home outside albums
    assert_eq!(summary.album_only_photos, 2);
    assert_eq!(summary.indexed, 5);
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_member_names_kept_byte_for_byte() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = Fixture::new();
    let album = fx.photo_root().join("Trip");
    fs::create_dir_all(&album).unwrap();
    let first = OsStr::from_bytes(b"x\xff.jpg");
    let second = OsStr::from_bytes(b"x\xfe.jpg");
    fs::write(album.join(first), b"first").unwrap();
    fs::write(album.join(second), b"second").unwrap();

    let summary = fx.run().unwrap();

    assert_eq!(summary.album_links, 2);
    assert_eq!(summary.album_only_photos, 2);
    assert_eq!(summary.collision_renames, 0);
    for (name, content) in [(first, &b"first"[..]), (second, &b"second"[..])] {
        let stored = fx.out("Album-only Photos").join(name);
        assert_eq!(fs::read(&stored).unwrap(), content);
        assert_links_to(&fx.out("Albums/Trip").join(name), &stored);
    }
}
