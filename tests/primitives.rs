use std::fs;
use tempfile::tempdir;

use fm_io::{
    ConflictPolicy, FsErrorKind, OpContext, OpError, copy_file, create_directory, create_file,
    remove_directory, remove_file,
};

#[test]
fn copy_file_reproduces_content_and_keeps_source() {
    let td = tempdir().unwrap();
    let src = td.path().join("src.bin");
    let dst = td.path().join("dst.bin");
    let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7 % 256) as u8).collect();
    fs::write(&src, &data).unwrap();

    copy_file(&src, &dst, ConflictPolicy::Fail, OpContext::new()).unwrap();
    assert_eq!(fs::read(&dst).unwrap(), data);
    assert_eq!(fs::read(&src).unwrap(), data);
}

#[test]
fn copy_file_fail_policy_leaves_destination_untouched() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::write(&src, b"new").unwrap();
    fs::write(&dst, b"original").unwrap();

    let err = copy_file(&src, &dst, ConflictPolicy::Fail, OpContext::new()).unwrap_err();
    assert!(matches!(err, OpError::DestinationExists(_)));
    assert_eq!(fs::read(&dst).unwrap(), b"original");
}

#[test]
fn copy_file_replace_all_overwrites_longer_destination() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::write(&src, b"short").unwrap();
    fs::write(&dst, vec![b'x'; 100_000]).unwrap();

    copy_file(&src, &dst, ConflictPolicy::ReplaceAll, OpContext::new()).unwrap();
    assert_eq!(fs::read(&dst).unwrap(), b"short");
}

#[test]
fn create_then_remove_round_trip() {
    let td = tempdir().unwrap();
    let dir = td.path().join("d");
    create_directory(&dir, false, 0o755).unwrap();
    let file = dir.join("f");
    create_file(&file).unwrap();

    assert_eq!(remove_directory(&dir).unwrap_err().kind(), FsErrorKind::NotEmpty);
    remove_file(&file).unwrap();
    remove_directory(&dir).unwrap();
    assert!(!dir.exists());
}

#[test]
fn mkdir_parents_with_relative_components() {
    let td = tempdir().unwrap();
    let deep = td.path().join("a").join("..").join("b").join("c");
    create_directory(&deep, true, 0o755).unwrap();
    assert!(td.path().join("b/c").is_dir());
}

#[cfg(unix)]
#[test]
fn symlink_overwrite_only_replaces_links() {
    use fm_io::create_symlink;
    use std::path::Path;

    let td = tempdir().unwrap();
    let link = td.path().join("ln");
    create_symlink(Path::new("one"), &link, ConflictPolicy::Fail).unwrap();
    create_symlink(Path::new("two"), &link, ConflictPolicy::ReplaceAll).unwrap();
    assert_eq!(fs::read_link(&link).unwrap(), Path::new("two"));
}
