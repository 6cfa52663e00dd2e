//! Whole-file writers. All of them create-or-truncate except [`append_file`].

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::conf::LINE_SEPARATOR;
use crate::spec::{FsError, Result};
use crate::util::options_with_mode;

/// Write `data` to `path`, replacing any content. `mode` applies on creation.
pub fn write_file<P: AsRef<Path>>(path: P, data: &[u8], mode: u32) -> Result<()> {
    _write("write_file", path.as_ref(), data, mode, false)
}

/// Write UTF-8 `text` to `path`, replacing any content.
pub fn write_text_file<P: AsRef<Path>>(path: P, text: &str, mode: u32) -> Result<()> {
    _write("write_text_file", path.as_ref(), text.as_bytes(), mode, false)
}

/// Write `lines`, each followed by [`LINE_SEPARATOR`].
pub fn write_file_lines<P, S>(path: P, lines: &[S], mode: u32) -> Result<()>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    _write(
        "write_file_lines",
        path.as_ref(),
        join_lines(lines, LINE_SEPARATOR).as_bytes(),
        mode,
        false,
    )
}

/// Write `lines`, each followed by `sep`.
pub fn write_file_lines_sep<P, S>(path: P, lines: &[S], sep: &str, mode: u32) -> Result<()>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    _write(
        "write_file_lines_sep",
        path.as_ref(),
        join_lines(lines, sep).as_bytes(),
        mode,
        false,
    )
}

/// Append `data` to `path`, creating it with `mode` if absent.
pub fn append_file<P: AsRef<Path>>(path: P, data: &[u8], mode: u32) -> Result<()> {
    _write("append_file", path.as_ref(), data, mode, true)
}

/// Terminator style: `["a", "b"]` becomes `"a{sep}b{sep}"`, `[]` becomes `""`.
fn join_lines<S: AsRef<str>>(lines: &[S], sep: &str) -> String {
    let n_cap = lines.iter().map(|l| l.as_ref().len() + sep.len()).sum();
    let mut txt = String::with_capacity(n_cap);
    for line in lines {
        txt.push_str(line.as_ref());
        txt.push_str(sep);
    }
    txt
}

fn _write(op: &'static str, path: &Path, data: &[u8], mode: u32, if_append: bool) -> Result<()> {
    debug!(path = ?path, n_bytes = data.len(), mode, "{op}");
    let mut options = options_with_mode(mode);
    options.create(true);
    if if_append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    let mut file = options.open(path).map_err(|e| FsError::io(op, path, e))?;
    file.write_all(data).map_err(|e| FsError::io(op, path, e))?;
    file.flush().map_err(|e| FsError::io(op, path, e))
}
