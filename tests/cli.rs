use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn hashes_single_file_fnv32() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hello.txt");
    std::fs::write(&path, "hello").unwrap();

    Command::cargo_bin("phash")
        .unwrap()
        .arg("--algo")
        .arg("fnv32")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("000000004f9f2cab"));
}

#[test]
fn defaults_to_fnv64() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hello.txt");
    std::fs::write(&path, "hello").unwrap();

    Command::cargo_bin("phash")
        .unwrap()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("a430d84680aabd0b"));
}

#[test]
fn walks_directories_in_filename_order() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("b.txt"), "bbb").unwrap();
    std::fs::write(dir.path().join("a.txt"), "aaa").unwrap();

    Command::cargo_bin("phash")
        .unwrap()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match("(?s)a\\.txt.*b\\.txt").unwrap());
}

#[test]
fn rejects_invalid_thread_count() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("x");
    std::fs::write(&path, "x").unwrap();

    Command::cargo_bin("phash")
        .unwrap()
        .arg("--threads")
        .arg("33")
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn requires_at_least_one_path() {
    Command::cargo_bin("phash").unwrap().assert().failure();
}
