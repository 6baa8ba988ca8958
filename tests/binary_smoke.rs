use assert_cmd::Command;
use assert_fs::prelude::*;
use std::fs;
use std::path::Path;

/// The binary with an isolated (absent) config file.
fn fm_io(cfg_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fm_io"));
    cmd.env("FM_IO_CONFIG", cfg_dir.join("config.xml"));
    cmd
}

#[test]
fn mkdir_touch_and_rm() {
    let temp = assert_fs::TempDir::new().unwrap();
    let deep = temp.path().join("x/y/z");

    fm_io(temp.path()).args(["mkdir", "-p"]).arg(&deep).assert().success();
    assert!(deep.is_dir());

    let file = deep.join("f.txt");
    fm_io(temp.path()).arg("touch").arg(&file).assert().success();
    assert!(file.is_file());
    // touch never overwrites
    fm_io(temp.path()).arg("touch").arg(&file).assert().failure();

    fm_io(temp.path()).args(["rm", "-r"]).arg(temp.path().join("x")).assert().success();
    assert!(!temp.path().join("x").exists());
}

#[test]
fn cp_respects_policy_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("src/a.txt").write_str("fresh").unwrap();
    temp.child("dst/a.txt").write_str("stale").unwrap();
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");

    fm_io(temp.path()).args(["cp", "-r"]).arg(&src).arg(&dst).assert().failure();
    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "stale");

    fm_io(temp.path())
        .args(["cp", "-r", "--policy", "replace_files"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "fresh");
}

#[test]
fn mv_moves_tree() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("src/sub/b.txt").write_str("b").unwrap();
    let src = temp.path().join("src");
    let dst = temp.path().join("moved");

    fm_io(temp.path()).arg("mv").arg(&src).arg(&dst).assert().success();
    assert!(!src.exists());
    assert_eq!(fs::read_to_string(dst.join("sub/b.txt")).unwrap(), "b");
}

#[test]
fn config_policy_applies_without_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("config.xml")
        .write_str("<config><conflict_policy>replace_all</conflict_policy></config>")
        .unwrap();
    temp.child("a.txt").write_str("new").unwrap();
    temp.child("b.txt").write_str("old").unwrap();

    fm_io(temp.path())
        .arg("cp")
        .arg(temp.path().join("a.txt"))
        .arg(temp.path().join("b.txt"))
        .assert()
        .success();
    assert_eq!(fs::read_to_string(temp.path().join("b.txt")).unwrap(), "new");
}

#[test]
fn malformed_config_is_reported() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("config.xml")
        .write_str("<config><bogus>1</bogus></config>")
        .unwrap();
    let out = fm_io(temp.path())
        .arg("touch")
        .arg(temp.path().join("f"))
        .assert()
        .failure()
        .get_output()
        .clone();
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown field"));
    assert!(!temp.path().join("f").exists());
}

#[test]
fn print_config_uses_env_override() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = fm_io(temp.path())
        .arg("--print-config")
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("FM_IO_CONFIG"));
    assert!(stdout.contains("config.xml"));
}

#[test]
fn missing_command_is_a_usage_error() {
    let temp = assert_fs::TempDir::new().unwrap();
    fm_io(temp.path()).assert().code(2);
}

#[cfg(unix)]
#[test]
fn ln_creates_symlink() {
    let temp = assert_fs::TempDir::new().unwrap();
    let link = temp.path().join("link");
    fm_io(temp.path()).args(["ln", "target"]).arg(&link).assert().success();
    assert_eq!(fs::read_link(&link).unwrap(), Path::new("target"));
}

#[cfg(unix)]
#[test]
fn log_file_behind_symlink_is_refused() {
    let temp = assert_fs::TempDir::new().unwrap();
    let real = temp.path().join("real");
    fs::create_dir(&real).unwrap();
    let alias = temp.path().join("alias");
    std::os::unix::fs::symlink(&real, &alias).unwrap();

    let out = fm_io(temp.path())
        .arg("--log-file")
        .arg(alias.join("fm.log"))
        .arg("mkdir")
        .arg(temp.path().join("d"))
        .assert()
        .success()
        .get_output()
        .clone();
    assert!(String::from_utf8_lossy(&out.stderr).contains("Refusing to enable file logging"));
    assert!(!real.join("fm.log").exists());
}
