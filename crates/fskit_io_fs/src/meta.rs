//! Permission, ownership and timestamp changes.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use filetime::{FileTime, set_file_times};
use tracing::debug;

use crate::spec::{FsError, Result};
use crate::util::{error_unsupported, is_mode_supported, is_ownership_supported};

/// Set the permission bits of `path` (links are followed).
///
/// Hosts without mode bits only honour the owner-write bit, which maps to the
/// read-only flag.
pub fn chmod<P: AsRef<Path>>(path: P, mode: u32) -> Result<()> {
    let path = path.as_ref();
    debug!(path = ?path, mode, "chmod");
    let perms = if is_mode_supported() {
        _permissions_from_mode(path, mode)?
    } else {
        let mut perms = fs::metadata(path)
            .map_err(|e| FsError::io("chmod", path, e))?
            .permissions();
        perms.set_readonly(mode & 0o200 == 0);
        perms
    };
    fs::set_permissions(path, perms).map_err(|e| FsError::io("chmod", path, e))
}

#[cfg(unix)]
fn _permissions_from_mode(_path: &Path, mode: u32) -> Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn _permissions_from_mode(path: &Path, _mode: u32) -> Result<fs::Permissions> {
    Err(error_unsupported("chmod", path, "permission bits"))
}

/// Change the owner and group of `path` (links are followed).
///
/// Fails with [`crate::EnumFsErrorKind::Unsupported`] on hosts without a
/// uid/gid model.
pub fn chown<P: AsRef<Path>>(path: P, uid: u32, gid: u32) -> Result<()> {
    let path = path.as_ref();
    if !is_ownership_supported() {
        return Err(error_unsupported("chown", path, "uid/gid ownership"));
    }
    debug!(path = ?path, uid, gid, "chown");
    _chown(path, uid, gid)
}

#[cfg(unix)]
fn _chown(path: &Path, uid: u32, gid: u32) -> Result<()> {
    std::os::unix::fs::chown(path, Some(uid), Some(gid)).map_err(|e| FsError::io("chown", path, e))
}

#[cfg(not(unix))]
fn _chown(path: &Path, _uid: u32, _gid: u32) -> Result<()> {
    Err(error_unsupported("chown", path, "uid/gid ownership"))
}

/// Set access and modification times of `path`.
pub fn chtimes<P: AsRef<Path>>(path: P, atime: SystemTime, mtime: SystemTime) -> Result<()> {
    let path = path.as_ref();
    debug!(path = ?path, "chtimes");
    set_file_times(
        path,
        FileTime::from_system_time(atime),
        FileTime::from_system_time(mtime),
    )
    .map_err(|e| FsError::io("chtimes", path, e))
}
