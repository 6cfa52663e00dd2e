//! Default permission modes and text constants.

/// Mode used by `*_default` directory operations.
pub const MODE_DIR_DEFAULT: u32 = 0o755;
/// Mode used by `*_default` file operations and [`crate::create`].
pub const MODE_FILE_DEFAULT: u32 = 0o644;

/// Host line separator used by [`crate::write_file_lines`].
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Host line separator used by [`crate::write_file_lines`].
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Placeholder marking the random part of a [`crate::create_temp`] pattern.
pub const C_TEMP_PLACEHOLDER: char = '*';
/// Number of random characters in a temp file name.
pub const N_TEMP_RANDOM_LEN: usize = 8;
