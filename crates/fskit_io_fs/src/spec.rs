//! Facade enums, option models and the error type.

use std::fmt;
use std::fs::FileType;
use std::io;
use std::path::PathBuf;

use crate::conf::MODE_FILE_DEFAULT;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Kind of a filesystem entry, read without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumEntryType {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symbolic link (the link itself, not its target).
    Symlink,
    /// Fifo, socket, device or anything else the host reports.
    Other,
}

impl EnumEntryType {
    /// Classify a host file type.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Dir
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Instruction returned by a [`crate::walk::WalkVisitor`] for each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumWalkControl {
    /// Keep walking.
    Continue,
    /// Do not descend into the current directory. Ignored for non-directories.
    SkipSubtree,
    /// Stop the whole walk without an error.
    Abort,
}

/// Existing destination file conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyFileConflictStrategy {
    /// Replace destination file with source file.
    Overwrite,
    /// Fail with [`EnumFsErrorKind::AlreadyExists`].
    Error,
    /// Keep destination file and skip current source file.
    Skip,
}

/// Symlink handling policy for tree copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopySymlinkStrategy {
    /// Create a link at destination pointing to the same target.
    CopySymlinks,
    /// Follow the link and copy the target file or directory.
    Dereference,
    /// Ignore symlink entries.
    SkipSymlinks,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Options for [`crate::copy_dir_with`] and [`crate::copy_file_with`].
#[derive(Debug, Clone)]
pub struct SpecCopyOptions {
    /// Conflict behavior for destination files and links.
    pub rule_conflict_file: EnumCopyFileConflictStrategy,
    /// Symlink handling behavior.
    pub rule_symlink: EnumCopySymlinkStrategy,
    /// Glob patterns applied to entry basenames; matches are not copied.
    pub patterns_exclude: Option<Vec<String>>,
    /// Also copy access/modify times and (on Linux) extended attributes.
    pub if_preserve_metadata: bool,
}

impl SpecCopyOptions {
    /// Options equivalent to a plain `overwrite` flag.
    pub fn from_overwrite(if_overwrite: bool) -> Self {
        let rule_conflict_file = if if_overwrite {
            EnumCopyFileConflictStrategy::Overwrite
        } else {
            EnumCopyFileConflictStrategy::Error
        };
        Self {
            rule_conflict_file,
            ..Self::default()
        }
    }
}

impl Default for SpecCopyOptions {
    fn default() -> Self {
        Self {
            rule_conflict_file: EnumCopyFileConflictStrategy::Error,
            rule_symlink: EnumCopySymlinkStrategy::CopySymlinks,
            patterns_exclude: None,
            if_preserve_metadata: false,
        }
    }
}

/// Flags for [`crate::open_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecOpenOptions {
    pub if_read: bool,
    pub if_write: bool,
    pub if_append: bool,
    pub if_truncate: bool,
    pub if_create: bool,
    /// Fail if the file already exists. Implies create.
    pub if_create_new: bool,
    /// Permission bits applied when the file is created.
    pub mode: u32,
}

impl Default for SpecOpenOptions {
    fn default() -> Self {
        Self {
            if_read: true,
            if_write: false,
            if_append: false,
            if_truncate: false,
            if_create: false,
            if_create_new: false,
            mode: MODE_FILE_DEFAULT,
        }
    }
}

/// One entry produced by [`crate::walk_dir`] or [`crate::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDirEntry {
    /// Full path, rooted at the walk root as given.
    pub path: PathBuf,
    /// Final path component (lossy UTF-8).
    pub name: String,
    /// Entry type, `None` when it could not be resolved.
    pub entry_type: Option<EnumEntryType>,
    /// Depth below the root; the root itself is 0.
    pub depth: usize,
}

impl SpecDirEntry {
    /// `true` when the entry is a real directory (not a link to one).
    pub fn is_dir(&self) -> bool {
        self.entry_type == Some(EnumEntryType::Dir)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Cause of a failed facade operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFsErrorKind {
    NotFound,
    AlreadyExists,
    NotADirectory,
    /// Entry exists with the opposite type (file vs directory).
    WrongType,
    NotEmpty,
    AccessDenied,
    /// The host lacks the feature (symlinks, ownership, ...).
    Unsupported,
    /// Arguments rejected before any host call.
    InvalidInput,
    /// Any other host I/O fault.
    IoFailure,
}

impl EnumFsErrorKind {
    /// Map a host error kind onto the facade taxonomy.
    pub fn from_io(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::NotADirectory => Self::NotADirectory,
            io::ErrorKind::IsADirectory => Self::WrongType,
            io::ErrorKind::DirectoryNotEmpty => Self::NotEmpty,
            io::ErrorKind::PermissionDenied => Self::AccessDenied,
            io::ErrorKind::Unsupported => Self::Unsupported,
            _ => Self::IoFailure,
        }
    }
}

impl fmt::Display for EnumFsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let txt = match self {
            Self::NotFound => "not found",
            Self::AlreadyExists => "already exists",
            Self::NotADirectory => "not a directory",
            Self::WrongType => "wrong entry type",
            Self::NotEmpty => "directory not empty",
            Self::AccessDenied => "access denied",
            Self::Unsupported => "unsupported on this host",
            Self::InvalidInput => "invalid input",
            Self::IoFailure => "i/o failure",
        };
        f.write_str(txt)
    }
}

/// Error returned by every fallible facade operation.
#[derive(Debug, thiserror::Error)]
#[error("{op} {}: {kind}{}", .path.display(), detail_suffix(.source, .message))]
pub struct FsError {
    /// Cause category callers branch on.
    pub kind: EnumFsErrorKind,
    /// Facade operation name, e.g. `"copy_file"`.
    pub op: &'static str,
    /// Path the operation failed on.
    pub path: PathBuf,
    /// Extra facade-level detail.
    pub message: Option<String>,
    /// Host error, if the failure came from the OS.
    #[source]
    pub source: Option<io::Error>,
}

fn detail_suffix(source: &Option<io::Error>, message: &Option<String>) -> String {
    match (message, source) {
        (Some(msg), _) => format!(" ({msg})"),
        (None, Some(e)) => format!(" ({e})"),
        (None, None) => String::new(),
    }
}

impl FsError {
    /// Wrap a host error with operation and path context.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            kind: EnumFsErrorKind::from_io(source.kind()),
            op,
            path: path.into(),
            message: None,
            source: Some(source),
        }
    }

    /// Build a facade-level error that has no host cause.
    pub fn new(
        kind: EnumFsErrorKind,
        op: &'static str,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            op,
            path: path.into(),
            message: Some(message.into()),
            source: None,
        }
    }

    /// Override the mapped kind, keeping the host cause.
    pub(crate) fn with_kind(mut self, kind: EnumFsErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> EnumFsErrorKind {
        self.kind
    }
}

/// Result alias for facade operations.
pub type Result<T> = std::result::Result<T, FsError>;

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io;

    use super::{EnumCopyFileConflictStrategy, EnumFsErrorKind, FsError, SpecCopyOptions};

    #[test]
    fn io_kinds_map_to_facade_kinds() {
        assert_eq!(
            EnumFsErrorKind::from_io(io::ErrorKind::NotFound),
            EnumFsErrorKind::NotFound
        );
        assert_eq!(
            EnumFsErrorKind::from_io(io::ErrorKind::PermissionDenied),
            EnumFsErrorKind::AccessDenied
        );
        assert_eq!(
            EnumFsErrorKind::from_io(io::ErrorKind::DirectoryNotEmpty),
            EnumFsErrorKind::NotEmpty
        );
        assert_eq!(
            EnumFsErrorKind::from_io(io::ErrorKind::Interrupted),
            EnumFsErrorKind::IoFailure
        );
    }

    #[test]
    fn error_display_carries_op_and_path() {
        let err = FsError::io(
            "read_file",
            "missing.txt",
            io::Error::from(io::ErrorKind::NotFound),
        );
        let txt = err.to_string();
        assert!(txt.starts_with("read_file missing.txt: not found"));
        assert_eq!(err.kind(), EnumFsErrorKind::NotFound);

        let err = FsError::new(EnumFsErrorKind::WrongType, "ensure_dir", "f", "is a file");
        assert_eq!(err.to_string(), "ensure_dir f: wrong entry type (is a file)");
    }

    #[test]
    fn copy_options_from_overwrite_flag() {
        assert_eq!(
            SpecCopyOptions::from_overwrite(true).rule_conflict_file,
            EnumCopyFileConflictStrategy::Overwrite
        );
        assert_eq!(
            SpecCopyOptions::from_overwrite(false).rule_conflict_file,
            EnumCopyFileConflictStrategy::Error
        );
    }
}
