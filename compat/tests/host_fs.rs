#![cfg(unix)]

use std::{
    fs,
    io::Write,
    os::unix::fs::symlink,
    path::{Path, PathBuf},
};

use compat::{
    mmap,
    root::{EscapeError, Root, StdFs},
};

/// A scratch directory removed on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("compat-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(path.join("root")).unwrap();
        Scratch(path)
    }

    fn root(&self) -> PathBuf {
        self.0.join("root")
    }

    fn open(&self) -> Root<StdFs> {
        Root::new(self.root().to_str().unwrap(), StdFs)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn touch(path: &Path) {
    fs::File::create(path).unwrap();
}

#[test]
fn symlinks_inside_root() {
    let s = Scratch::new("inside");
    let root = s.root();

    fs::create_dir(root.join("dir")).unwrap();
    fs::create_dir(root.join("c")).unwrap();
    touch(&root.join("c/file"));
    symlink("../b", root.join("dir/a")).unwrap();
    symlink(root.join("c"), root.join("b")).unwrap();

    let r = s.open();
    assert!(r.check_path_escapes("dir/a").is_ok());
    assert!(r.check_path_escapes("dir/a/file").is_ok());
    assert!(r.check_path_escapes("dir/a/not-yet").is_ok());
}

#[test]
fn symlinks_leaving_root() {
    let s = Scratch::new("leaving");
    let root = s.root();

    fs::create_dir(root.join("dir")).unwrap();
    touch(&s.0.join("secret"));
    symlink("../../secret", root.join("dir/up")).unwrap();
    symlink(s.0.join("secret"), root.join("abs")).unwrap();

    let r = s.open();
    assert!(matches!(
        r.check_path_escapes("dir/up"),
        Err(EscapeError::Escapes)
    ));
    assert!(matches!(
        r.check_path_escapes("abs"),
        Err(EscapeError::Escapes)
    ));
    assert!(r.check_path_escapes_lstat("abs").is_ok());
}

#[test]
fn symlink_cycle() {
    let s = Scratch::new("cycle");
    let root = s.root();

    symlink("b", root.join("a")).unwrap();
    symlink("a", root.join("b")).unwrap();

    let err = s.open().check_path_escapes("a/x").unwrap_err();
    assert!(matches!(err, EscapeError::TooManySymlinks));
}

#[test]
fn file_in_the_middle() {
    let s = Scratch::new("notdir");
    touch(&s.root().join("file"));

    assert!(matches!(
        s.open().check_path_escapes("file/x"),
        Err(EscapeError::NotADirectory)
    ));
}

#[test]
fn trailing_slash_through_link() {
    let s = Scratch::new("slash");
    let root = s.root();

    touch(&root.join("file"));
    fs::create_dir(root.join("dir")).unwrap();
    symlink("file", root.join("link")).unwrap();
    symlink("dir", root.join("dirlink")).unwrap();

    let r = s.open();
    assert!(matches!(
        r.check_path_escapes("file/"),
        Err(EscapeError::NotADirectory)
    ));
    assert!(matches!(
        r.check_path_escapes("link/"),
        Err(EscapeError::NotADirectory)
    ));
    assert!(r.check_path_escapes("link").is_ok());
    assert!(r.check_path_escapes("dirlink/").is_ok());
}

#[test]
fn map_reads_whole_file() {
    let s = Scratch::new("mmap");
    let path = s.root().join("data");
    fs::File::create(&path)
        .unwrap()
        .write_all(b"hello, board")
        .unwrap();

    let m = mmap::map(fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(&m[..], b"hello, board");
    assert!(m.source().metadata().unwrap().is_file());
    mmap::unmap(m).unwrap();
}
