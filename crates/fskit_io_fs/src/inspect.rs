//! Existence checks and metadata lookups.

use std::fs::{self, Metadata};
use std::path::Path;

use crate::spec::{EnumEntryType, FsError, Result};
use crate::util::is_lookup_true;

/// `true` if `path` resolves to an entry. Dangling symlinks do not exist.
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    is_lookup_true(fs::metadata(path.as_ref()), |_| true)
}

/// `true` if `path` resolves to a regular file.
pub fn is_file<P: AsRef<Path>>(path: P) -> bool {
    is_lookup_true(fs::metadata(path.as_ref()), Metadata::is_file)
}

/// `true` if `path` resolves to a directory.
pub fn is_dir<P: AsRef<Path>>(path: P) -> bool {
    is_lookup_true(fs::metadata(path.as_ref()), Metadata::is_dir)
}

/// `true` if the entry at `path` is itself a symbolic link.
pub fn is_symlink<P: AsRef<Path>>(path: P) -> bool {
    is_lookup_true(fs::symlink_metadata(path.as_ref()), |meta| {
        meta.file_type().is_symlink()
    })
}

/// Metadata of the entry at `path`, following symlinks.
pub fn stat<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    let path = path.as_ref();
    fs::metadata(path).map_err(|e| FsError::io("stat", path, e))
}

/// Metadata of the entry at `path` itself; links are not followed.
pub fn lstat<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    let path = path.as_ref();
    fs::symlink_metadata(path).map_err(|e| FsError::io("lstat", path, e))
}

/// Type of the entry at `path`, without following links.
pub fn entry_type<P: AsRef<Path>>(path: P) -> Result<EnumEntryType> {
    let path = path.as_ref();
    let meta = fs::symlink_metadata(path).map_err(|e| FsError::io("entry_type", path, e))?;
    Ok(EnumEntryType::from_file_type(meta.file_type()))
}
