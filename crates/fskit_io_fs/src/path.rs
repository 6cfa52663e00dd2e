//! Working directory and path resolution.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::spec::{FsError, Result};

/// Current working directory of the process.
pub fn cwd() -> Result<PathBuf> {
    env::current_dir().map_err(|e| FsError::io("cwd", ".", e))
}

/// Absolute, lexically normalized form of `path`.
///
/// An empty `base` resolves against [`cwd`]; a relative `base` is itself
/// resolved against [`cwd`] first. The path does not need to exist and
/// symlinks are not followed.
pub fn resolve<P, B>(path: P, base: B) -> Result<PathBuf>
where
    P: AsRef<Path>,
    B: AsRef<Path>,
{
    let path = path.as_ref();
    let base = base.as_ref();
    if path.is_absolute() {
        return Ok(normalize_lexically(path));
    }

    let path_base = if base.as_os_str().is_empty() {
        cwd()?
    } else if base.is_absolute() {
        base.to_path_buf()
    } else {
        cwd()?.join(base)
    };
    Ok(normalize_lexically(&path_base.join(path)))
}

/// Remove `.` components and fold `..` into its parent, never above the root.
pub(crate) fn normalize_lexically(path: &Path) -> PathBuf {
    let mut path_out = PathBuf::new();
    let mut n_normal = 0_usize;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => path_out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if n_normal > 0 {
                    path_out.pop();
                    n_normal -= 1;
                } else if !path_out.has_root() {
                    path_out.push("..");
                }
            }
            Component::Normal(part) => {
                path_out.push(part);
                n_normal += 1;
            }
        }
    }
    if path_out.as_os_str().is_empty() {
        path_out.push(".");
    }
    path_out
}

/// Anchor a relative `path` to [`cwd`]; fails if the working directory is
/// unavailable rather than guessing one.
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(cwd()?.join(path))
}
