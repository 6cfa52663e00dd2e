use fskit_io_fs::MODE_FILE_DEFAULT;
use proptest::prelude::*;
use tempfile::TempDir;

// A line may hold anything but the host separator.
#[cfg(windows)]
const PATTERN_LINE: &str = "[^\r\n]*";
#[cfg(not(windows))]
const PATTERN_LINE: &str = "[^\n]*";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_bytes_round_trip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("blob");

        fskit_io_fs::write_file(&path_file, &data, MODE_FILE_DEFAULT).expect("write");
        prop_assert_eq!(fskit_io_fs::read_file(&path_file).expect("read"), data);
    }

    #[test]
    fn test_lines_round_trip(lines in proptest::collection::vec(PATTERN_LINE, 0..16)) {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("lines.txt");

        fskit_io_fs::write_file_lines(&path_file, &lines, MODE_FILE_DEFAULT).expect("write");
        prop_assert_eq!(fskit_io_fs::read_file_lines(&path_file).expect("read"), lines);
    }

    #[test]
    fn test_exists_tracks_lifecycle(name in "[a-z]{1,12}") {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join(&name);

        prop_assert!(!fskit_io_fs::exists(&path_file));
        fskit_io_fs::ensure_file_default(&path_file).expect("ensure");
        prop_assert!(fskit_io_fs::exists(&path_file));
        fskit_io_fs::remove_all(&path_file).expect("remove");
        prop_assert!(!fskit_io_fs::exists(&path_file));
    }
}
