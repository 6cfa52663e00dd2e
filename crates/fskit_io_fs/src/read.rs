//! Whole-file readers.

use std::fs;
use std::path::Path;

use crate::conf::LINE_SEPARATOR;
use crate::spec::{FsError, Result};

/// Read the whole file into memory. No size limit is applied.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| FsError::io("read_file", path, e))
}

/// Read the whole file as UTF-8 text.
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| FsError::io("read_text_file", path, e))
}

/// Read the file as lines with terminators stripped.
///
/// Lines end at [`LINE_SEPARATOR`]; a bare `\n` also ends a line. Any other
/// `\r` is kept as line content. A final terminator does not produce an
/// extra empty line, and an empty file yields no lines.
pub fn read_file_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let txt = fs::read_to_string(path).map_err(|e| FsError::io("read_file_lines", path, e))?;
    Ok(split_lines(&txt, LINE_SEPARATOR))
}

fn split_lines(txt: &str, sep: &str) -> Vec<String> {
    if txt.is_empty() {
        return Vec::new();
    }
    let if_crlf = sep == "\r\n";
    let body = txt.strip_suffix('\n').unwrap_or(txt);
    body.split('\n')
        .map(|line| {
            let line = if if_crlf {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            };
            line.to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::{read_file, read_file_lines, read_text_file, split_lines};
    use crate::spec::EnumFsErrorKind;

    #[test]
    fn reads_bytes_text_and_lines() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("testfile");
        std::fs::write(&path_file, "test data").expect("write");

        assert_eq!(read_file(&path_file).expect("bytes"), b"test data".to_vec());
        assert_eq!(read_text_file(&path_file).expect("text"), "test data");
        assert_eq!(
            read_file_lines(&path_file).expect("lines"),
            vec!["test data".to_string()]
        );
    }

    #[test]
    fn lines_strip_terminators() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("lines");
        std::fs::write(&path_file, "a\nb\n\nc\n").expect("write");
        assert_eq!(
            read_file_lines(&path_file).expect("lines"),
            vec!["a", "b", "", "c"]
        );
    }

    #[test]
    fn carriage_return_is_content_unless_separator_is_crlf() {
        assert_eq!(split_lines("a\r\nb\n", "\n"), vec!["a\r", "b"]);
        assert_eq!(split_lines("a\r\nb\n", "\r\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\r\n", "\r\n"), vec!["a\r"]);
        assert_eq!(split_lines("\n", "\n"), vec![""]);
        assert_eq!(split_lines("a\nb", "\n"), vec!["a", "b"]);
        assert!(split_lines("", "\n").is_empty());
    }

    #[cfg(not(windows))]
    #[test]
    fn trailing_carriage_return_survives_round_trip() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("cr");
        crate::write::write_file_lines(&path_file, &["a\r", "b"], 0o644).expect("write");
        assert_eq!(
            read_file_lines(&path_file).expect("lines"),
            vec!["a\r", "b"]
        );
    }

    #[test]
    fn empty_file_has_no_lines() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("empty");
        std::fs::write(&path_file, "").expect("write");
        assert!(read_file_lines(&path_file).expect("lines").is_empty());
        assert!(read_file(&path_file).expect("bytes").is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().expect("tempdir");
        let err = read_file(tmp.path().join("missing")).expect_err("missing");
        assert_eq!(err.kind(), EnumFsErrorKind::NotFound);
    }

    #[test]
    fn invalid_utf8_is_io_failure() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("bin");
        std::fs::write(&path_file, [0xff_u8, 0xfe, 0x00]).expect("write");
        let err = read_text_file(&path_file).expect_err("not utf-8");
        assert_eq!(err.kind(), EnumFsErrorKind::IoFailure);
    }
}
