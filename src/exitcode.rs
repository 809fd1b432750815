//! Exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error, e.g. a missing content directory
pub const USAGE: i32 = 64;

/// Data format error: some documents cannot be transformed
pub const DATAERR: i32 = 65;

/// Requested content not found (or not renderable)
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
