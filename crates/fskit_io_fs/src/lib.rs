//! `fskit_io_fs` v1:
//! Free-function filesystem facade over `std::fs`.
//!
//! Every fallible operation returns [`FsError`], which carries the operation
//! name, the path and a portable [`EnumFsErrorKind`]. Predicates
//! (`exists`, `is_file`, ...) never fail and answer `false` on lookup errors.
//!
//! Modules:
//! - `conf`    : default modes, line separator, temp-name settings
//! - `spec`    : enums/options/entries/errors
//! - `path`    : working directory and lexical path resolution
//! - `inspect` : existence predicates and metadata lookups
//! - `create`  : directories, files, temp files and handles
//! - `copy`    : file and tree copy
//! - `report`  : copy run counters
//! - `read`    : whole-file reads
//! - `write`   : whole-file writes and appends
//! - `link`    : links, rename and removal
//! - `meta`    : permissions, ownership and timestamps
//! - `walk`    : tree traversal and directory listing

pub mod conf;
pub mod copy;
pub mod create;
pub mod inspect;
pub mod link;
pub mod meta;
pub mod path;
pub mod read;
pub mod report;
pub mod spec;
mod util;
pub mod walk;
pub mod write;

pub use conf::{LINE_SEPARATOR, MODE_DIR_DEFAULT, MODE_FILE_DEFAULT};
pub use copy::{copy, copy_dir, copy_dir_with, copy_file, copy_file_with};
pub use create::{
    create, create_temp, ensure_dir, ensure_dir_default, ensure_file, ensure_file_default, mkdir,
    mkdir_all, mkdir_all_default, mkdir_default, open, open_file,
};
pub use inspect::{entry_type, exists, is_dir, is_file, is_symlink, lstat, stat};
pub use link::{link, read_link, remove, remove_all, rename, symlink};
pub use meta::{chmod, chown, chtimes};
pub use path::{cwd, resolve};
pub use read::{read_file, read_file_lines, read_text_file};
pub use report::ReportCopy;
pub use spec::{
    EnumCopyFileConflictStrategy, EnumCopySymlinkStrategy, EnumEntryType, EnumFsErrorKind,
    EnumWalkControl, FsError, Result, SpecCopyOptions, SpecDirEntry, SpecOpenOptions,
};
pub use util::{
    is_hard_link_supported, is_mode_supported, is_ownership_supported, is_symlink_supported,
};
pub use walk::{WalkVisitor, read_dir, walk_dir};
pub use write::{append_file, write_file, write_file_lines, write_file_lines_sep, write_text_file};
