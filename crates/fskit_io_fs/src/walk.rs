//! Depth-first tree traversal and single-level listing.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::spec::{EnumEntryType, EnumWalkControl, FsError, Result, SpecDirEntry};

/// Per-entry callback for [`walk_dir`].
///
/// `err` is set when the entry could not be resolved or, for a directory,
/// when it could not be listed. Returning `Err` stops the walk and surfaces
/// that error from [`walk_dir`].
pub trait WalkVisitor {
    fn visit(&mut self, entry: &SpecDirEntry, err: Option<&FsError>) -> Result<EnumWalkControl>;
}

impl<F> WalkVisitor for F
where
    F: FnMut(&SpecDirEntry, Option<&FsError>) -> Result<EnumWalkControl>,
{
    fn visit(&mut self, entry: &SpecDirEntry, err: Option<&FsError>) -> Result<EnumWalkControl> {
        self(entry, err)
    }
}

fn _entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Walk the tree rooted at `root`, visiting `root` first.
///
/// Traversal is depth-first with an explicit stack, so deep trees do not
/// grow the call stack. Sibling order is the host listing order. Symlinks are
/// reported but never followed.
pub fn walk_dir<P, V>(root: P, mut visitor: V) -> Result<()>
where
    P: AsRef<Path>,
    V: WalkVisitor,
{
    let path_root = root.as_ref();
    let spec_entry_root = match fs::symlink_metadata(path_root) {
        Ok(meta) => SpecDirEntry {
            path: path_root.to_path_buf(),
            name: _entry_name(path_root),
            entry_type: Some(EnumEntryType::from_file_type(meta.file_type())),
            depth: 0,
        },
        Err(e) => {
            let spec_entry = SpecDirEntry {
                path: path_root.to_path_buf(),
                name: _entry_name(path_root),
                entry_type: None,
                depth: 0,
            };
            let err = FsError::io("walk_dir", path_root, e);
            visitor.visit(&spec_entry, Some(&err))?;
            return Ok(());
        }
    };

    let mut l_stack: Vec<SpecDirEntry> = vec![spec_entry_root];
    while let Some(spec_entry) = l_stack.pop() {
        trace!(path = ?spec_entry.path, depth = spec_entry.depth, "walk_dir visit");
        match visitor.visit(&spec_entry, None)? {
            EnumWalkControl::Abort => return Ok(()),
            EnumWalkControl::SkipSubtree => continue,
            EnumWalkControl::Continue => {}
        }
        if !spec_entry.is_dir() {
            continue;
        }

        let iter_entries = match fs::read_dir(&spec_entry.path) {
            Ok(v) => v,
            Err(e) => {
                let err = FsError::io("walk_dir", &spec_entry.path, e);
                if visitor.visit(&spec_entry, Some(&err))? == EnumWalkControl::Abort {
                    return Ok(());
                }
                continue;
            }
        };

        let mut l_children: Vec<SpecDirEntry> = Vec::new();
        for entry_res in iter_entries {
            let spec_child = match entry_res {
                Ok(entry) => {
                    let path_child = entry.path();
                    match entry.file_type() {
                        Ok(file_type) => SpecDirEntry {
                            name: entry.file_name().to_string_lossy().to_string(),
                            path: path_child,
                            entry_type: Some(EnumEntryType::from_file_type(file_type)),
                            depth: spec_entry.depth + 1,
                        },
                        Err(e) => {
                            let spec_child = SpecDirEntry {
                                name: entry.file_name().to_string_lossy().to_string(),
                                path: path_child.clone(),
                                entry_type: None,
                                depth: spec_entry.depth + 1,
                            };
                            let err = FsError::io("walk_dir", path_child, e);
                            if visitor.visit(&spec_child, Some(&err))? == EnumWalkControl::Abort {
                                return Ok(());
                            }
                            continue;
                        }
                    }
                }
                Err(e) => {
                    let err = FsError::io("walk_dir", &spec_entry.path, e);
                    if visitor.visit(&spec_entry, Some(&err))? == EnumWalkControl::Abort {
                        return Ok(());
                    }
                    continue;
                }
            };
            l_children.push(spec_child);
        }
        // Reverse so the first listed child is popped first.
        l_stack.extend(l_children.into_iter().rev());
    }
    Ok(())
}

/// List the direct children of `path`, sorted by name.
pub fn read_dir<P: AsRef<Path>>(path: P) -> Result<Vec<SpecDirEntry>> {
    let path = path.as_ref();
    let iter_entries = fs::read_dir(path).map_err(|e| FsError::io("read_dir", path, e))?;

    let mut l_entries = Vec::new();
    for entry_res in iter_entries {
        let entry = entry_res.map_err(|e| FsError::io("read_dir", path, e))?;
        let path_entry: PathBuf = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| FsError::io("read_dir", &path_entry, e))?;
        l_entries.push(SpecDirEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path: path_entry,
            entry_type: Some(EnumEntryType::from_file_type(file_type)),
            depth: 1,
        });
    }
    l_entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(l_entries)
}
