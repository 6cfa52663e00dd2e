//! Directory and file creation, plus handle-opening helpers.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::conf::{MODE_DIR_DEFAULT, MODE_FILE_DEFAULT, N_TEMP_RANDOM_LEN};
use crate::spec::{EnumFsErrorKind, FsError, Result, SpecOpenOptions};
use crate::util::{builder_dir, options_with_mode, split_temp_pattern};

////////////////////////////////////////////////////////////////////////////////
// #region Directories

/// Create exactly one directory level with `mode`.
pub fn mkdir<P: AsRef<Path>>(path: P, mode: u32) -> Result<()> {
    let path = path.as_ref();
    debug!(path = ?path, mode, "mkdir");
    builder_dir(mode, false)
        .create(path)
        .map_err(|e| FsError::io("mkdir", path, e))
}

/// [`mkdir`] with [`MODE_DIR_DEFAULT`].
pub fn mkdir_default<P: AsRef<Path>>(path: P) -> Result<()> {
    mkdir(path, MODE_DIR_DEFAULT)
}

/// Create `path` and every missing parent with `mode`.
///
/// Succeeds when `path` already is a directory. Fails with
/// [`EnumFsErrorKind::NotADirectory`] when an existing segment is not one.
pub fn mkdir_all<P: AsRef<Path>>(path: P, mode: u32) -> Result<()> {
    mkdir_all_for("mkdir_all", path.as_ref(), mode)
}

/// [`mkdir_all`] with [`MODE_DIR_DEFAULT`].
pub fn mkdir_all_default<P: AsRef<Path>>(path: P) -> Result<()> {
    mkdir_all(path, MODE_DIR_DEFAULT)
}

pub(crate) fn mkdir_all_for(op: &'static str, path: &Path, mode: u32) -> Result<()> {
    debug!(path = ?path, mode, "{op}");
    match builder_dir(mode, true).create(path) {
        Ok(()) => Ok(()),
        // The final segment exists but is not a directory.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(FsError::io(op, path, e).with_kind(EnumFsErrorKind::NotADirectory))
        }
        Err(e) => Err(FsError::io(op, path, e)),
    }
}

/// Make sure `path` is a directory, creating it (and parents) if missing.
///
/// Fails with [`EnumFsErrorKind::WrongType`] if `path` exists but is not a
/// directory.
pub fn ensure_dir<P: AsRef<Path>>(path: P, mode: u32) -> Result<()> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(FsError::new(
            EnumFsErrorKind::WrongType,
            "ensure_dir",
            path,
            "exists and is not a directory",
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => mkdir_all_for("ensure_dir", path, mode),
        Err(e) => Err(FsError::io("ensure_dir", path, e)),
    }
}

/// [`ensure_dir`] with [`MODE_DIR_DEFAULT`].
pub fn ensure_dir_default<P: AsRef<Path>>(path: P) -> Result<()> {
    ensure_dir(path, MODE_DIR_DEFAULT)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Files

/// Make sure `path` is a regular file, creating an empty one if missing.
///
/// Missing parents are created with [`MODE_DIR_DEFAULT`]. Existing content is
/// never touched. Fails with [`EnumFsErrorKind::WrongType`] if `path` is a
/// directory.
pub fn ensure_file<P: AsRef<Path>>(path: P, mode: u32) -> Result<()> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => return Ok(()),
        Ok(_) => {
            return Err(FsError::new(
                EnumFsErrorKind::WrongType,
                "ensure_file",
                path,
                "exists and is not a regular file",
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(FsError::io("ensure_file", path, e)),
    }

    if let Some(path_parent) = path.parent()
        && !path_parent.as_os_str().is_empty()
    {
        mkdir_all_for("ensure_file", path_parent, MODE_DIR_DEFAULT)?;
    }
    debug!(path = ?path, mode, "ensure_file");
    options_with_mode(mode)
        .write(true)
        .create(true)
        .open(path)
        .map(drop)
        .map_err(|e| FsError::io("ensure_file", path, e))
}

/// [`ensure_file`] with [`MODE_FILE_DEFAULT`].
pub fn ensure_file_default<P: AsRef<Path>>(path: P) -> Result<()> {
    ensure_file(path, MODE_FILE_DEFAULT)
}

/// Create or truncate `path` and return a read/write handle at offset 0.
///
/// The caller owns the handle; dropping it closes the file.
pub fn create<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    debug!(path = ?path, "create");
    options_with_mode(MODE_FILE_DEFAULT)
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| FsError::io("create", path, e))
}

/// Create a uniquely named file in `dir` and return it with its path.
///
/// An empty `dir` means the host temp directory. The last `*` in `pattern`
/// marks where the random part goes; without one it is appended. A pattern
/// holding a path separator fails with [`EnumFsErrorKind::InvalidInput`]. The
/// file is not removed when the handle is dropped.
pub fn create_temp<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<(File, PathBuf)> {
    let dir = dir.as_ref();
    let path_dir = if dir.as_os_str().is_empty() {
        std::env::temp_dir()
    } else {
        dir.to_path_buf()
    };
    if pattern.chars().any(std::path::is_separator) {
        return Err(FsError::new(
            EnumFsErrorKind::InvalidInput,
            "create_temp",
            &path_dir,
            format!("pattern contains a path separator: {pattern}"),
        ));
    }
    let (prefix, suffix) = split_temp_pattern(pattern);

    let temp_file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .rand_bytes(N_TEMP_RANDOM_LEN)
        .tempfile_in(&path_dir)
        .map_err(|e| {
            let err = FsError::io("create_temp", &path_dir, e);
            // tempfile gives up with AlreadyExists once its retries run out.
            if err.kind() == EnumFsErrorKind::AlreadyExists {
                err.with_kind(EnumFsErrorKind::IoFailure)
            } else {
                err
            }
        })?;
    let (file, path_file) = temp_file
        .keep()
        .map_err(|e| FsError::io("create_temp", &path_dir, e.error))?;
    debug!(path = ?path_file, "create_temp");
    Ok((file, path_file))
}

/// Open `path` read-only.
pub fn open<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    File::open(path).map_err(|e| FsError::io("open", path, e))
}

/// Open `path` with explicit flags; `mode` applies only on creation.
pub fn open_file<P: AsRef<Path>>(path: P, spec_open_options: &SpecOpenOptions) -> Result<File> {
    let path = path.as_ref();
    options_with_mode(spec_open_options.mode)
        .read(spec_open_options.if_read)
        .write(spec_open_options.if_write)
        .append(spec_open_options.if_append)
        .truncate(spec_open_options.if_truncate)
        .create(spec_open_options.if_create)
        .create_new(spec_open_options.if_create_new)
        .open(path)
        .map_err(|e| FsError::io("open_file", path, e))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
