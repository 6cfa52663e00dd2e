//! File and directory-tree copy.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use tracing::{debug, trace};

use crate::create::mkdir_all_for;
use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{
    EnumCopyFileConflictStrategy, EnumCopySymlinkStrategy, EnumFsErrorKind, FsError, Result,
    SpecCopyOptions,
};
use crate::util::{
    builder_dir, compile_exclude_patterns, copy_file_metadata, copy_symbolic_link, is_occupied,
    is_overlap, is_same_file, mode_of,
};

/// Copy `src` to `dst`, choosing [`copy_dir`] or [`copy_file`] from the
/// type of `src` (links are followed).
pub fn copy<P, Q>(src: P, dst: Q, overwrite: bool) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (path_src, path_dst) = (src.as_ref(), dst.as_ref());
    let meta_src = fs::metadata(path_src).map_err(|e| FsError::io("copy", path_src, e))?;
    if meta_src.is_dir() {
        copy_dir(path_src, path_dst, overwrite)
    } else {
        copy_file(path_src, path_dst, overwrite)
    }
}

/// Copy one regular file, keeping its permission bits.
///
/// With `overwrite = false` an occupied `dst` fails with
/// [`EnumFsErrorKind::AlreadyExists`] and is left untouched. A `dst` that is
/// the source file itself (same path or hard link) fails with
/// [`EnumFsErrorKind::InvalidInput`].
pub fn copy_file<P, Q>(src: P, dst: Q, overwrite: bool) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    copy_file_with(src, dst, &SpecCopyOptions::from_overwrite(overwrite))
}

/// Copy one regular file under the conflict and metadata rules of
/// `spec_cp_options`. `patterns_exclude` and `rule_symlink` do not apply.
pub fn copy_file_with<P, Q>(src: P, dst: Q, spec_cp_options: &SpecCopyOptions) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    _copy_file("copy_file", src.as_ref(), dst.as_ref(), spec_cp_options).map(drop)
}

/// Mirror the directory `src` into `dst`.
///
/// Files follow [`copy_file`] rules for `overwrite`; symlinks are recreated.
/// The first failure stops the copy and may leave a partial tree behind.
pub fn copy_dir<P, Q>(src: P, dst: Q, overwrite: bool) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    copy_dir_with(src, dst, &SpecCopyOptions::from_overwrite(overwrite)).map(drop)
}

/// Mirror the directory `src` into `dst` under `spec_cp_options`.
///
/// Traversal is sequential and uses an explicit stack. Directories are created
/// with the source mode and merged when they already exist. Special files are
/// skipped and reported as warnings.
///
/// Fails with [`EnumFsErrorKind::NotADirectory`] when `src` is not a directory
/// and with [`EnumFsErrorKind::InvalidInput`] when one path contains the other
/// or an exclude pattern does not compile. Both checks run before anything is
/// written.
pub fn copy_dir_with<P, Q>(src: P, dst: Q, spec_cp_options: &SpecCopyOptions) -> Result<ReportCopy>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (path_dir_src, path_dir_dst) = (src.as_ref(), dst.as_ref());
    let meta_src =
        fs::metadata(path_dir_src).map_err(|e| FsError::io("copy_dir", path_dir_src, e))?;
    if !meta_src.is_dir() {
        return Err(FsError::new(
            EnumFsErrorKind::NotADirectory,
            "copy_dir",
            path_dir_src,
            "source is not a directory",
        ));
    }
    if is_overlap(path_dir_src, path_dir_dst)? {
        return Err(FsError::new(
            EnumFsErrorKind::InvalidInput,
            "copy_dir",
            path_dir_dst,
            format!("source and destination overlap: {}", path_dir_src.display()),
        ));
    }
    let globs_exclude =
        compile_exclude_patterns(spec_cp_options.patterns_exclude.as_deref(), path_dir_src)?;

    debug!(src = ?path_dir_src, dst = ?path_dir_dst, "copy_dir");
    let mut spec_cp_ctx = SpecCopyContext {
        spec_cp_options,
        globs_exclude,
        builder_cp_report: ReportCopyBuilder::default(),
        l_dirs_mode_pending: Vec::new(),
    };

    let if_dst_created = !is_occupied("copy_dir", path_dir_dst)?;
    mkdir_all_for("copy_dir", path_dir_dst, _mode_writable(mode_of(&meta_src)))?;
    if if_dst_created {
        spec_cp_ctx
            .l_dirs_mode_pending
            .push((path_dir_dst.to_path_buf(), meta_src.permissions()));
    }

    let mut l_stack = vec![SpecCopyTaskDir {
        path_dir_src: path_dir_src.to_path_buf(),
        path_dir_dst: path_dir_dst.to_path_buf(),
        l_ancestors: _dir_id(&meta_src).into_iter().collect(),
    }];
    while let Some(spec_task) = l_stack.pop() {
        let l_children = spec_cp_ctx.copy_level(&spec_task)?;
        l_stack.extend(l_children.into_iter().rev());
    }

    spec_cp_ctx.apply_dir_modes()?;
    let report = spec_cp_ctx.builder_cp_report.build();
    debug!(report = %report, "copy_dir done");
    Ok(report)
}

/// (device, inode) of a directory, where the host exposes one.
type DirId = (u64, u64);

#[cfg(unix)]
fn _dir_id(meta: &fs::Metadata) -> Option<DirId> {
    use std::os::unix::fs::MetadataExt;
    Some((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn _dir_id(_meta: &fs::Metadata) -> Option<DirId> {
    None
}

struct SpecCopyTaskDir {
    path_dir_src: PathBuf,
    path_dir_dst: PathBuf,
    // Directories on the way down from the root; a dereferenced link back into
    // one of them is a loop.
    l_ancestors: Vec<DirId>,
}

struct SpecCopyContext<'a> {
    spec_cp_options: &'a SpecCopyOptions,
    globs_exclude: Option<GlobSet>,
    builder_cp_report: ReportCopyBuilder,
    // Created directories get their final mode after their children are written.
    l_dirs_mode_pending: Vec<(PathBuf, fs::Permissions)>,
}

impl SpecCopyContext<'_> {
    /// Copy the entries of one source directory; returns subdirectories to descend.
    fn copy_level(&mut self, spec_task: &SpecCopyTaskDir) -> Result<Vec<SpecCopyTaskDir>> {
        let path_src = spec_task.path_dir_src.as_path();
        let iter_entries =
            fs::read_dir(path_src).map_err(|e| FsError::io("copy_dir", path_src, e))?;

        let mut l_entries = Vec::new();
        for entry_res in iter_entries {
            let entry = entry_res.map_err(|e| FsError::io("copy_dir", path_src, e))?;
            l_entries.push(entry);
        }
        l_entries.sort_by_key(|e| e.file_name());

        let mut l_dirs_next = Vec::new();
        for entry in l_entries {
            let path_entry_src = entry.path();
            let path_entry_dst = spec_task.path_dir_dst.join(entry.file_name());
            self.builder_cp_report.add_scanned();
            trace!(path = ?path_entry_src, "copy_dir entry");

            if self.is_excluded(&entry.file_name()) {
                self.builder_cp_report.add_skipped();
                continue;
            }

            let file_type = entry
                .file_type()
                .map_err(|e| FsError::io("copy_dir", &path_entry_src, e))?;
            let meta_entry = if file_type.is_symlink() {
                match self.spec_cp_options.rule_symlink {
                    EnumCopySymlinkStrategy::SkipSymlinks => {
                        self.builder_cp_report.add_skipped();
                        continue;
                    }
                    EnumCopySymlinkStrategy::CopySymlinks => {
                        self.copy_link(&path_entry_src, &path_entry_dst)?;
                        continue;
                    }
                    EnumCopySymlinkStrategy::Dereference => fs::metadata(&path_entry_src)
                        .map_err(|e| FsError::io("copy_dir", &path_entry_src, e))?,
                }
            } else {
                entry
                    .metadata()
                    .map_err(|e| FsError::io("copy_dir", &path_entry_src, e))?
            };

            if meta_entry.is_dir() {
                let dir_id = _dir_id(&meta_entry);
                if dir_id.is_some_and(|id| spec_task.l_ancestors.contains(&id)) {
                    self.builder_cp_report
                        .add_warning(format!("Symlink loop detected: {}", path_entry_src.display()));
                    continue;
                }
                self.create_dir(&path_entry_dst, &meta_entry)?;
                let mut l_ancestors = spec_task.l_ancestors.clone();
                l_ancestors.extend(dir_id);
                l_dirs_next.push(SpecCopyTaskDir {
                    path_dir_src: path_entry_src,
                    path_dir_dst: path_entry_dst,
                    l_ancestors,
                });
            } else if meta_entry.is_file() {
                let if_copied =
                    _copy_file("copy_dir", &path_entry_src, &path_entry_dst, self.spec_cp_options)?;
                if if_copied {
                    self.builder_cp_report.add_copied();
                } else {
                    self.builder_cp_report.add_skipped();
                }
            } else {
                self.builder_cp_report
                    .add_warning(format!("Special file skipped: {}", path_entry_src.display()));
            }
        }
        Ok(l_dirs_next)
    }

    fn is_excluded(&self, name: &OsStr) -> bool {
        self.globs_exclude
            .as_ref()
            .is_some_and(|globs| globs.is_match(Path::new(name)))
    }

    fn create_dir(&mut self, path_dst: &Path, meta_src: &fs::Metadata) -> Result<()> {
        match fs::symlink_metadata(path_dst) {
            Ok(meta_dst) if meta_dst.is_dir() => {}
            Ok(_) => {
                return Err(FsError::new(
                    EnumFsErrorKind::NotADirectory,
                    "copy_dir",
                    path_dst,
                    "destination entry is not a directory",
                ));
            }
            Err(_) => {
                builder_dir(_mode_writable(mode_of(meta_src)), false)
                    .create(path_dst)
                    .map_err(|e| FsError::io("copy_dir", path_dst, e))?;
                self.l_dirs_mode_pending
                    .push((path_dst.to_path_buf(), meta_src.permissions()));
            }
        }
        self.builder_cp_report.add_dir();
        Ok(())
    }

    fn copy_link(&mut self, path_src: &Path, path_dst: &Path) -> Result<()> {
        if is_occupied("copy_dir", path_dst)? {
            match self.spec_cp_options.rule_conflict_file {
                EnumCopyFileConflictStrategy::Skip => {
                    self.builder_cp_report.add_skipped();
                    return Ok(());
                }
                EnumCopyFileConflictStrategy::Error => {
                    return Err(FsError::new(
                        EnumFsErrorKind::AlreadyExists,
                        "copy_dir",
                        path_dst,
                        "destination exists",
                    ));
                }
                EnumCopyFileConflictStrategy::Overwrite => _remove_non_dir("copy_dir", path_dst)?,
            }
        }
        copy_symbolic_link(path_src, path_dst)?;
        self.builder_cp_report.add_linked();
        Ok(())
    }

    fn apply_dir_modes(&mut self) -> Result<()> {
        // Deepest first so a read-only parent never blocks its children.
        while let Some((path_dir, perms)) = self.l_dirs_mode_pending.pop() {
            fs::set_permissions(&path_dir, perms)
                .map_err(|e| FsError::io("copy_dir", &path_dir, e))?;
        }
        Ok(())
    }
}

/// Returns `Ok(false)` when the conflict rule skipped the file.
fn _copy_file(
    op: &'static str,
    path_src: &Path,
    path_dst: &Path,
    spec_cp_options: &SpecCopyOptions,
) -> Result<bool> {
    let meta_src = fs::metadata(path_src).map_err(|e| FsError::io(op, path_src, e))?;
    if meta_src.is_dir() {
        return Err(FsError::new(
            EnumFsErrorKind::WrongType,
            op,
            path_src,
            "source is a directory",
        ));
    }

    if is_occupied(op, path_dst)? {
        match spec_cp_options.rule_conflict_file {
            EnumCopyFileConflictStrategy::Skip => {
                trace!(path = ?path_dst, "copy skipped, destination exists");
                return Ok(false);
            }
            EnumCopyFileConflictStrategy::Error => {
                return Err(FsError::new(
                    EnumFsErrorKind::AlreadyExists,
                    op,
                    path_dst,
                    "destination exists",
                ));
            }
            EnumCopyFileConflictStrategy::Overwrite => {
                let meta_dst =
                    fs::symlink_metadata(path_dst).map_err(|e| FsError::io(op, path_dst, e))?;
                if meta_dst.is_dir() {
                    return Err(FsError::new(
                        EnumFsErrorKind::WrongType,
                        op,
                        path_dst,
                        "destination is a directory",
                    ));
                }
                // Replace a link rather than writing through it.
                if meta_dst.file_type().is_symlink() {
                    _remove_non_dir(op, path_dst)?;
                } else if is_same_file(path_src, &meta_src, path_dst, &meta_dst) {
                    // Truncating the destination would wipe the source.
                    return Err(FsError::new(
                        EnumFsErrorKind::InvalidInput,
                        op,
                        path_dst,
                        format!("same file as source: {}", path_src.display()),
                    ));
                }
            }
        }
    }

    debug!(src = ?path_src, dst = ?path_dst, "copy_file");
    fs::copy(path_src, path_dst).map_err(|e| FsError::io(op, path_dst, e))?;
    if spec_cp_options.if_preserve_metadata {
        copy_file_metadata(path_src, path_dst).map_err(|e| FsError::io(op, path_dst, e))?;
    }
    Ok(true)
}

fn _remove_non_dir(op: &'static str, path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(|e| FsError::io(op, path, e))?;
    if meta.is_dir() {
        return Err(FsError::new(
            EnumFsErrorKind::WrongType,
            op,
            path,
            "destination is a directory",
        ));
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::FileTypeExt;
        if meta.file_type().is_symlink_dir() {
            return fs::remove_dir(path).map_err(|e| FsError::io(op, path, e));
        }
    }
    fs::remove_file(path).map_err(|e| FsError::io(op, path, e))
}

fn _mode_writable(mode: u32) -> u32 {
    mode | 0o700
}
