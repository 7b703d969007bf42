//! Checking that paths opened beneath a root directory stay beneath it.
//!
//! Without `openat` the check walks the path one component at a time with `lstat`, splicing
//! symbolic links into the remaining path as they are met. A concurrent change to the tree
//! between the check and the eventual open is not detected.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

/// Maximum number of symbolic links followed while resolving a single path.
pub const MAX_SYMLINKS: usize = 8;

/// The kind of a directory entry, as reported by `lstat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A directory.
    Dir,
    /// A symbolic link. Not followed.
    Symlink,
    /// Anything else.
    Other,
}

/// The filesystem operations needed to resolve a path.
pub trait FileSystem {
    /// Error returned by the underlying filesystem.
    type Error;

    /// Returns the kind of entry at `path` without following a final symbolic link, or
    /// `None` if there is nothing there.
    fn lstat(&self, path: &str) -> Result<Option<FileKind>, Self::Error>;

    /// Returns the target of the symbolic link at `path`.
    fn read_link(&self, path: &str) -> Result<String, Self::Error>;
}

/// Reasons a path is refused.
#[derive(Debug)]
pub enum EscapeError<E> {
    /// The path resolves to somewhere outside the root.
    Escapes,
    /// Resolution followed more than [`MAX_SYMLINKS`] links.
    TooManySymlinks,
    /// A non-final component is not a directory.
    NotADirectory,
    /// The path is empty.
    EmptyPath,
    /// The root has been closed.
    Closed,
    /// The filesystem failed.
    Io(E),
}

impl<E: fmt::Display> fmt::Display for EscapeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscapeError::Escapes => write!(f, "path escapes from parent"),
            EscapeError::TooManySymlinks => write!(f, "too many symlinks"),
            EscapeError::NotADirectory => write!(f, "not a directory"),
            EscapeError::EmptyPath => write!(f, "empty path"),
            EscapeError::Closed => write!(f, "use of closed root"),
            EscapeError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for EscapeError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EscapeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// A directory that confines the paths resolved beneath it.
#[derive(Debug)]
pub struct Root<F> {
    name: String,
    fs: F,
    closed: AtomicBool,
}

impl<F: FileSystem> Root<F> {
    /// Opens the directory `name` as a root over `fs`.
    pub fn new(name: &str, fs: F) -> Self {
        Self {
            name: name.to_string(),
            fs,
            closed: AtomicBool::new(false),
        }
    }

    /// Path of the root directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Closes the root. Every later check fails with [`EscapeError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Returns whether the root has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Checks that `name`, resolved relative to the root, stays within it.
    ///
    /// A path whose resolution reaches a component that does not exist is accepted: it can
    /// only be created beneath the entries already checked.
    pub fn check_path_escapes(&self, name: &str) -> Result<(), EscapeError<F::Error>> {
        self.check(name, false)
    }

    /// Same as [`check_path_escapes`](Self::check_path_escapes), but a symbolic link in the
    /// final component is not followed.
    pub fn check_path_escapes_lstat(&self, name: &str) -> Result<(), EscapeError<F::Error>> {
        self.check(name, true)
    }

    fn check(&self, name: &str, lstat: bool) -> Result<(), EscapeError<F::Error>> {
        if self.is_closed() {
            return Err(EscapeError::Closed);
        }
        if name.is_empty() {
            return Err(EscapeError::EmptyPath);
        }
        if name.starts_with('/') {
            return Err(EscapeError::Escapes);
        }

        let mut parts = split(name);
        let mut trailing_sep = name.ends_with('/');
        let mut symlinks = 0;
        let mut i = 0;

        while i < parts.len() {
            if parts[i] == ".." {
                let end = parts[i..]
                    .iter()
                    .position(|p| p != "..")
                    .map_or(parts.len(), |n| i + n);
                let count = end - i;
                if count > i {
                    return Err(EscapeError::Escapes);
                }
                parts.drain(i - count..end);
                i -= count;
                continue;
            }

            let last = i == parts.len() - 1;
            if last && lstat {
                break;
            }

            let path = self.join(&parts[..=i]);
            let kind = match self.fs.lstat(&path).map_err(EscapeError::Io)? {
                Some(kind) => kind,
                None => return Ok(()),
            };

            match kind {
                FileKind::Symlink => {
                    let target = self
                        .fs
                        .read_link(&path)
                        .map_err(|_| EscapeError::Escapes)?;

                    symlinks += 1;
                    if symlinks > MAX_SYMLINKS {
                        return Err(EscapeError::TooManySymlinks);
                    }

                    // Absolute targets restart resolution from the root
                    let (prefix, target) = if target.starts_with('/') {
                        (0, self.rebase(&target).ok_or(EscapeError::Escapes)?)
                    } else {
                        (i, target.as_str())
                    };

                    // A trailing separator still applies to whatever the link leads to
                    if last {
                        trailing_sep = trailing_sep || target.ends_with('/');
                    }

                    let mut spliced = parts[..prefix].to_vec();
                    spliced.extend(split(target));
                    spliced.extend_from_slice(&parts[i + 1..]);
                    parts = spliced;
                    i = prefix;
                }
                FileKind::Other if !last || trailing_sep => {
                    return Err(EscapeError::NotADirectory);
                }
                _ => i += 1,
            }
        }

        Ok(())
    }

    /// Strips the root prefix from an absolute link target, if the target lies beneath it.
    fn rebase<'t>(&self, target: &'t str) -> Option<&'t str> {
        let rest = target.strip_prefix(self.name.trim_end_matches('/'))?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest.trim_start_matches('/'))
        } else {
            None
        }
    }

    fn join(&self, parts: &[String]) -> String {
        let mut path = self.name.trim_end_matches('/').to_string();
        for part in parts {
            path.push('/');
            path.push_str(part);
        }
        path
    }
}

/// Splits a path into its components, dropping empty and `.` ones.
fn split(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|p| !p.is_empty() && *p != ".")
        .map(|p| p.to_string())
        .collect()
}

/// The host filesystem.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

#[cfg(feature = "std")]
impl FileSystem for StdFs {
    type Error = std::io::Error;

    fn lstat(&self, path: &str) -> std::io::Result<Option<FileKind>> {
        match std::fs::symlink_metadata(path) {
            Ok(meta) => {
                let ft = meta.file_type();
                Ok(Some(if ft.is_symlink() {
                    FileKind::Symlink
                } else if ft.is_dir() {
                    FileKind::Dir
                } else {
                    FileKind::Other
                }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read_link(&self, path: &str) -> std::io::Result<String> {
        std::fs::read_link(path)?
            .into_os_string()
            .into_string()
            .map_err(|_| {
                std::io::Error::new(std::io::ErrorKind::InvalidData, "link target is not UTF-8")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Clone)]
    enum Entry {
        Dir,
        File,
        Link(&'static str),
    }

    /// In-memory tree keyed by absolute path.
    #[derive(Debug, Default)]
    struct MemFs(HashMap<String, Entry>);

    impl MemFs {
        fn with(entries: &[(&str, Entry)]) -> Self {
            let mut fs = MemFs::default();
            fs.0.insert("/root".to_string(), Entry::Dir);
            for (path, entry) in entries {
                fs.0.insert(format!("/root/{}", path), entry.clone());
            }
            fs
        }
    }

    #[derive(Debug, PartialEq)]
    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "broken")
        }
    }

    impl FileSystem for MemFs {
        type Error = Broken;

        fn lstat(&self, path: &str) -> Result<Option<FileKind>, Broken> {
            if path.contains("broken") {
                return Err(Broken);
            }
            Ok(self.0.get(path).map(|e| match e {
                Entry::Dir => FileKind::Dir,
                Entry::File => FileKind::Other,
                Entry::Link(_) => FileKind::Symlink,
            }))
        }

        fn read_link(&self, path: &str) -> Result<String, Broken> {
            match self.0.get(path) {
                Some(Entry::Link(target)) => Ok(target.to_string()),
                _ => Err(Broken),
            }
        }
    }

    fn root(entries: &[(&str, Entry)]) -> Root<MemFs> {
        Root::new("/root", MemFs::with(entries))
    }

    #[test]
    fn plain_paths() {
        let r = root(&[("dir", Entry::Dir), ("dir/file", Entry::File)]);

        assert!(r.check_path_escapes("dir/file").is_ok());
        assert!(r.check_path_escapes("./dir//file").is_ok());
        assert!(r.check_path_escapes("dir/../dir/file").is_ok());
        assert!(r.check_path_escapes("dir/missing/deeper").is_ok());
        assert!(r.check_path_escapes("..").is_err());
        assert!(matches!(
            r.check_path_escapes("dir/../../x"),
            Err(EscapeError::Escapes)
        ));
        assert!(matches!(
            r.check_path_escapes("/etc/passwd"),
            Err(EscapeError::Escapes)
        ));
        assert!(matches!(
            r.check_path_escapes(""),
            Err(EscapeError::EmptyPath)
        ));
    }

    #[test]
    fn links_resolving_inside() {
        let r = root(&[
            ("dir", Entry::Dir),
            ("dir/a", Entry::Link("../b")),
            ("b", Entry::Link("/root/c")),
            ("c", Entry::Dir),
        ]);

        assert!(r.check_path_escapes("dir/a").is_ok());
        assert!(r.check_path_escapes("dir/a/new").is_ok());
    }

    #[test]
    fn links_leaving_root() {
        let r = root(&[
            ("dir", Entry::Dir),
            ("dir/up", Entry::Link("../../outside")),
            ("abs", Entry::Link("/etc")),
            ("sibling", Entry::Link("/rootkit")),
        ]);

        for name in ["dir/up", "abs", "abs/passwd", "sibling"] {
            assert!(
                matches!(r.check_path_escapes(name), Err(EscapeError::Escapes)),
                "{} should escape",
                name
            );
        }
    }

    #[test]
    fn link_cycle() {
        let r = root(&[("a", Entry::Link("b")), ("b", Entry::Link("a"))]);

        let err = r.check_path_escapes("a").unwrap_err();
        assert!(matches!(err, EscapeError::TooManySymlinks));
        assert_eq!(err.to_string(), "too many symlinks");
    }

    #[test]
    fn chain_at_limit() {
        let r = root(&[
            ("l1", Entry::Link("l2")),
            ("l2", Entry::Link("l3")),
            ("l3", Entry::Link("l4")),
            ("l4", Entry::Link("l5")),
            ("l5", Entry::Link("l6")),
            ("l6", Entry::Link("l7")),
            ("l7", Entry::Link("l8")),
            ("l8", Entry::Link("end")),
            ("end", Entry::Dir),
            ("l0", Entry::Link("l1")),
        ]);

        assert!(r.check_path_escapes("l1").is_ok());
        assert!(matches!(
            r.check_path_escapes("l0"),
            Err(EscapeError::TooManySymlinks)
        ));
    }

    #[test]
    fn files_are_not_directories() {
        let r = root(&[
            ("file", Entry::File),
            ("link", Entry::Link("file")),
            ("dirlink", Entry::Link("dir")),
            ("slashlink", Entry::Link("file/")),
            ("dir", Entry::Dir),
        ]);

        assert!(r.check_path_escapes("file").is_ok());
        assert!(matches!(
            r.check_path_escapes("file/x"),
            Err(EscapeError::NotADirectory)
        ));
        assert!(matches!(
            r.check_path_escapes("file/"),
            Err(EscapeError::NotADirectory)
        ));

        assert!(r.check_path_escapes("link").is_ok());
        assert!(matches!(
            r.check_path_escapes("link/"),
            Err(EscapeError::NotADirectory)
        ));
        assert!(matches!(
            r.check_path_escapes("slashlink"),
            Err(EscapeError::NotADirectory)
        ));
        assert!(r.check_path_escapes("dirlink/").is_ok());
    }

    #[test]
    fn lstat_keeps_final_link() {
        let r = root(&[("dir", Entry::Dir), ("dir/out", Entry::Link("/etc"))]);

        assert!(r.check_path_escapes("dir/out").is_err());
        assert!(r.check_path_escapes_lstat("dir/out").is_ok());
        assert!(r.check_path_escapes_lstat("dir/out/passwd").is_err());
    }

    #[test]
    fn filesystem_errors_propagate() {
        let r = root(&[("broken", Entry::Dir)]);

        assert!(matches!(
            r.check_path_escapes("broken/x"),
            Err(EscapeError::Io(Broken))
        ));
    }

    #[test]
    fn closed_root() {
        let r = root(&[]);
        r.close();

        assert!(r.is_closed());
        assert!(matches!(
            r.check_path_escapes("anything"),
            Err(EscapeError::Closed)
        ));
    }
}
