//! Standard exit codes for the xxupack binary
//!
//! Kept distinct so scripted callers can tell a bad flag from a bad file.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Configuration error (unknown calculator type, malformed option value)
pub const EXIT_CONFIG_ERROR: i32 = 102;

/// I/O error (hex file not found, output path unwritable, disk error)
pub const EXIT_IO_ERROR: i32 = 103;

/// Packing error (payload rejected, container could not be produced)
pub const EXIT_PACK_ERROR: i32 = 104;
