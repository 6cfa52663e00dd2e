//! Links, renames and removals.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::spec::{FsError, Result};
use crate::util::{create_symlink, error_unsupported, is_hard_link_supported};

/// Create a hard link `new_path` pointing to the same inode as `old_path`.
///
/// Fails with [`crate::EnumFsErrorKind::Unsupported`] on hosts without hard
/// links.
pub fn link<P, Q>(old_path: P, new_path: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (old_path, new_path) = (old_path.as_ref(), new_path.as_ref());
    if !is_hard_link_supported() {
        return Err(error_unsupported("link", new_path, "hard links"));
    }
    debug!(from = ?old_path, to = ?new_path, "link");
    fs::hard_link(old_path, new_path).map_err(|e| FsError::io("link", new_path, e))
}

/// Create a symbolic link at `link_path` pointing to `target`.
///
/// `target` does not need to exist. Fails with
/// [`crate::EnumFsErrorKind::Unsupported`] on hosts without symlinks.
pub fn symlink<P, Q>(target: P, link_path: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (target, link_path) = (target.as_ref(), link_path.as_ref());
    debug!(target = ?target, link = ?link_path, "symlink");
    // Relative targets are resolved from the link's directory.
    let path_target_resolved = match link_path.parent() {
        Some(path_parent) if target.is_relative() => path_parent.join(target),
        _ => target.to_path_buf(),
    };
    create_symlink("symlink", target, link_path, path_target_resolved.is_dir())
}

/// Target stored in the symbolic link at `path`.
pub fn read_link<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    fs::read_link(path).map_err(|e| FsError::io("read_link", path, e))
}

/// Move `old_path` to `new_path`.
///
/// An existing file at `new_path` is replaced. Replacing a directory follows
/// host rules (an empty directory may be replaced by a directory on Unix).
pub fn rename<P, Q>(old_path: P, new_path: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (old_path, new_path) = (old_path.as_ref(), new_path.as_ref());
    debug!(from = ?old_path, to = ?new_path, "rename");
    fs::rename(old_path, new_path).map_err(|e| FsError::io("rename", old_path, e))
}

/// Remove exactly one entry: a file, a symlink, or an empty directory.
pub fn remove<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let meta = fs::symlink_metadata(path).map_err(|e| FsError::io("remove", path, e))?;
    debug!(path = ?path, "remove");
    let res = if meta.is_dir() {
        fs::remove_dir(path)
    } else {
        _remove_non_dir(path, &meta)
    };
    res.map_err(|e| FsError::io("remove", path, e))
}

/// Remove `path` and everything below it. A missing path is not an error.
///
/// Symlinks are removed, never followed.
pub fn remove_all<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let meta = match fs::symlink_metadata(path) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(FsError::io("remove_all", path, e)),
    };
    debug!(path = ?path, "remove_all");
    let res = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        _remove_non_dir(path, &meta)
    };
    match res {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FsError::io("remove_all", path, e)),
    }
}

#[cfg(windows)]
fn _remove_non_dir(path: &Path, meta: &fs::Metadata) -> io::Result<()> {
    use std::os::windows::fs::FileTypeExt;
    if meta.file_type().is_symlink_dir() {
        return fs::remove_dir(path);
    }
    fs::remove_file(path)
}

#[cfg(not(windows))]
fn _remove_non_dir(path: &Path, _meta: &fs::Metadata) -> io::Result<()> {
    fs::remove_file(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{link, read_link, remove, remove_all, rename, symlink};
    use crate::inspect::{exists, is_symlink};
    use crate::spec::EnumFsErrorKind;
    use crate::util::is_hard_link_supported;

    #[test]
    fn hard_link_shares_content() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("testfile");
        let path_link = tmp.path().join("testfile_link");
        std::fs::write(&path_file, "test data").expect("write");

        link(&path_file, &path_link).expect("link");
        assert_eq!(std::fs::read_to_string(&path_link).expect("read"), "test data");

        let err = link(&path_file, &path_link).expect_err("occupied");
        assert_eq!(err.kind(), EnumFsErrorKind::AlreadyExists);
    }

    #[test]
    fn hard_link_follows_capability_query() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("testfile");
        std::fs::write(&path_file, "x").expect("write");

        let res = link(&path_file, tmp.path().join("testfile_hard"));
        if is_hard_link_supported() {
            res.expect("supported host links");
        } else {
            assert_eq!(res.expect_err("unsupported").kind(), EnumFsErrorKind::Unsupported);
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlink_allows_dangling_and_rejects_occupied() {
        let tmp = TempDir::new().expect("tempdir");
        let path_link = tmp.path().join("testfile_symlink");

        symlink("missing_target", &path_link).expect("dangling ok");
        assert!(is_symlink(&path_link));
        assert!(!exists(&path_link));
        assert_eq!(
            read_link(&path_link).expect("read_link"),
            std::path::PathBuf::from("missing_target")
        );

        let err = symlink("other", &path_link).expect_err("occupied");
        assert_eq!(err.kind(), EnumFsErrorKind::AlreadyExists);
    }

    #[test]
    fn rename_moves_entry() {
        let tmp = TempDir::new().expect("tempdir");
        let path_a = tmp.path().join("testfilex");
        let path_b = tmp.path().join("testfile_renamed");
        std::fs::write(&path_a, "x").expect("write");

        rename(&path_a, &path_b).expect("rename");
        assert!(!exists(&path_a));
        assert!(exists(&path_b));

        let err = rename(&path_a, &path_b).expect_err("source gone");
        assert_eq!(err.kind(), EnumFsErrorKind::NotFound);
    }

    #[test]
    fn rename_replaces_existing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path_a = tmp.path().join("a");
        let path_b = tmp.path().join("b");
        std::fs::write(&path_a, "new").expect("write a");
        std::fs::write(&path_b, "old").expect("write b");

        rename(&path_a, &path_b).expect("rename");
        assert_eq!(std::fs::read_to_string(&path_b).expect("read"), "new");
    }

    #[test]
    fn remove_single_entries() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("testfile88");
        let path_dir = tmp.path().join("d");
        std::fs::write(&path_file, "x").expect("write");
        std::fs::create_dir(&path_dir).expect("mkdir");

        remove(&path_file).expect("remove file");
        remove(&path_dir).expect("remove empty dir");
        assert!(!exists(&path_file));
        assert!(!exists(&path_dir));

        let err = remove(&path_file).expect_err("gone");
        assert_eq!(err.kind(), EnumFsErrorKind::NotFound);
    }

    #[test]
    fn remove_non_empty_dir_is_not_empty() {
        let tmp = TempDir::new().expect("tempdir");
        let path_dir = tmp.path().join("full");
        std::fs::create_dir(&path_dir).expect("mkdir");
        std::fs::write(path_dir.join("f"), "x").expect("write");

        let err = remove(&path_dir).expect_err("not empty");
        assert_eq!(err.kind(), EnumFsErrorKind::NotEmpty);
        assert!(exists(path_dir.join("f")));
    }

    #[test]
    fn remove_all_tree_and_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let path_root = tmp.path().join("testdir9999");
        std::fs::create_dir_all(path_root.join("text/deeper")).expect("mkdir");
        std::fs::write(path_root.join("text/f"), "x").expect("write");

        remove_all(&path_root).expect("remove_all");
        assert!(!exists(&path_root));
        remove_all(&path_root).expect("absent is fine");
    }

    #[cfg(unix)]
    #[test]
    fn remove_all_does_not_follow_links() {
        let tmp = TempDir::new().expect("tempdir");
        let path_keep = tmp.path().join("keep");
        std::fs::create_dir(&path_keep).expect("mkdir");
        std::fs::write(path_keep.join("f"), "x").expect("write");
        let path_tree = tmp.path().join("tree");
        std::fs::create_dir(&path_tree).expect("mkdir");
        std::os::unix::fs::symlink(&path_keep, path_tree.join("link")).expect("symlink");

        remove_all(&path_tree).expect("remove_all");
        assert!(exists(path_keep.join("f")));

        std::os::unix::fs::symlink(&path_keep, tmp.path().join("top_link")).expect("symlink");
        remove(tmp.path().join("top_link")).expect("remove link");
        assert!(exists(&path_keep));
    }
}
