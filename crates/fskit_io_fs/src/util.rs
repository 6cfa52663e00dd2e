use std::fs::{self, DirBuilder, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::spec::{EnumFsErrorKind, FsError, Result};

////////////////////////////////////////////////////////////////////////////////
// #region HostCapabilities

/// Whether the host has symbolic links the facade can create.
pub fn is_symlink_supported() -> bool {
    cfg!(any(unix, windows))
}

/// Whether the host has hard links the facade can create.
pub fn is_hard_link_supported() -> bool {
    cfg!(any(unix, windows))
}

/// Whether the host has a uid/gid ownership model.
pub fn is_ownership_supported() -> bool {
    cfg!(unix)
}

/// Whether the host honours POSIX permission bits.
pub fn is_mode_supported() -> bool {
    cfg!(unix)
}

pub(crate) fn error_unsupported(op: &'static str, path: &Path, feature: &str) -> FsError {
    FsError::new(
        EnumFsErrorKind::Unsupported,
        op,
        path,
        format!("{feature} not available on this host"),
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Lookups

/// Collapse a fallible lookup into a yes/no answer.
///
/// Predicates like [`crate::exists`] answer "does this hold"; a failed lookup
/// (missing entry, permission denied, I/O fault) means it does not.
pub(crate) fn is_lookup_true<T>(res: io::Result<T>, predicate: impl FnOnce(&T) -> bool) -> bool {
    match res {
        Ok(v) => predicate(&v),
        Err(_) => false,
    }
}

/// `Ok(true)` when an entry (including a dangling link) occupies `path`.
pub(crate) fn is_occupied(op: &'static str, path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(FsError::io(op, path, e)),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ModeApplication

pub(crate) fn builder_dir(mode: u32, if_recursive: bool) -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(if_recursive);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    {
        let _ = mode;
    }
    builder
}

/// Permission bits of `meta`; hosts without mode bits get a read-only guess.
pub(crate) fn mode_of(meta: &fs::Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o7777
    }
    #[cfg(not(unix))]
    {
        if meta.permissions().readonly() { 0o555 } else { 0o755 }
    }
}

pub(crate) fn options_with_mode(mode: u32) -> OpenOptions {
    let mut options = OpenOptions::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    {
        let _ = mode;
    }
    options
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CopyHelpers

pub(crate) fn compile_exclude_patterns(
    patterns: Option<&[String]>,
    path_root: &Path,
) -> Result<Option<GlobSet>> {
    let Some(patterns) = patterns else {
        return Ok(None);
    };
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            FsError::new(
                EnumFsErrorKind::InvalidInput,
                "copy_dir",
                path_root,
                format!("Invalid exclude pattern: {e}"),
            )
        })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|e| {
        FsError::new(
            EnumFsErrorKind::InvalidInput,
            "copy_dir",
            path_root,
            format!("Invalid exclude pattern: {e}"),
        )
    })?;
    Ok(Some(set))
}

fn _absolutize_path(path: &Path) -> Result<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Ok(resolved);
    }
    Ok(crate::path::normalize_lexically(&crate::path::absolutize(path)?))
}

/// `true` when one directory contains the other.
///
/// Fails when a relative path cannot be anchored to the working directory.
pub(crate) fn is_overlap(src: &Path, dst: &Path) -> Result<bool> {
    let src_resolved = _absolutize_path(src)?;
    let dst_resolved = _absolutize_path(dst)?;
    Ok(dst_resolved.starts_with(&src_resolved) || src_resolved.starts_with(&dst_resolved))
}

/// `true` when both paths name the same file, hard links included.
///
/// Unix compares (device, inode); other hosts compare canonical paths, which
/// does not see through hard links.
pub(crate) fn is_same_file(
    path_a: &Path,
    meta_a: &fs::Metadata,
    path_b: &Path,
    meta_b: &fs::Metadata,
) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let _ = (path_a, path_b);
        meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino()
    }
    #[cfg(not(unix))]
    {
        let _ = (meta_a, meta_b);
        match (fs::canonicalize(path_a), fs::canonicalize(path_b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// Recreate the link at `path_src` as `path_dst`, pointing to the same target.
pub(crate) fn copy_symbolic_link(path_src: &Path, path_dst: &Path) -> Result<()> {
    let target = fs::read_link(path_src).map_err(|e| FsError::io("copy_dir", path_src, e))?;
    // Windows needs to know the target kind; resolve it relative to the source link.
    let if_target_dir = path_src.is_dir();
    create_symlink("copy_dir", &target, path_dst, if_target_dir)
}

pub(crate) fn create_symlink(
    op: &'static str,
    target: &Path,
    path_link: &Path,
    if_target_dir: bool,
) -> Result<()> {
    if !is_symlink_supported() {
        return Err(error_unsupported(op, path_link, "symbolic links"));
    }

    #[cfg(unix)]
    {
        let _ = if_target_dir;
        std::os::unix::fs::symlink(target, path_link).map_err(|e| FsError::io(op, path_link, e))
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};
        let res = if if_target_dir {
            symlink_dir(target, path_link)
        } else {
            symlink_file(target, path_link)
        };
        res.map_err(|e| FsError::io(op, path_link, e))
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = (target, if_target_dir);
        Err(error_unsupported(op, path_link, "symbolic links"))
    }
}

/// Copy access/modify times and, on Linux, extended attributes.
///
/// Time failures are reported; xattr copying is best effort.
pub(crate) fn copy_file_metadata(path_file_src: &Path, path_file_dst: &Path) -> io::Result<()> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    #[cfg(target_os = "linux")]
    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(path = ?path_file_src, error = %e, "xattr listing unavailable");
            return;
        }
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        if let Err(e) = xattr::set(path_file_dst, &name, &raw_value) {
            tracing::warn!(path = ?path_file_dst, attr = ?name, error = %e, "xattr not copied");
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TempNames

/// Split a temp-name pattern at its last `*` into (prefix, suffix).
pub(crate) fn split_temp_pattern(pattern: &str) -> (&str, &str) {
    match pattern.rfind(crate::conf::C_TEMP_PLACEHOLDER) {
        Some(idx) => (&pattern[..idx], &pattern[idx + 1..]),
        None => (pattern, ""),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{is_lookup_true, is_overlap, split_temp_pattern};

    #[test]
    fn lookup_errors_collapse_to_false() {
        let res: std::io::Result<u8> = Err(std::io::Error::other("boom"));
        assert!(!is_lookup_true(res, |_| true));
        assert!(is_lookup_true(Ok(3_u8), |v| *v == 3));
    }

    #[test]
    fn temp_pattern_splits_on_last_star() {
        assert_eq!(split_temp_pattern("log-*.txt"), ("log-", ".txt"));
        assert_eq!(split_temp_pattern("a*b*c"), ("a*b", "c"));
        assert_eq!(split_temp_pattern("plain"), ("plain", ""));
    }

    #[test]
    fn overlap_detects_nesting_both_ways() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        std::fs::create_dir_all(&src).expect("mkdir src");
        assert!(is_overlap(&src, &src.join("nested")).expect("overlap"));
        assert!(is_overlap(&src.join("nested"), &src).expect("overlap"));
        assert!(!is_overlap(&src, &tmp.path().join("dst")).expect("overlap"));
    }
}
