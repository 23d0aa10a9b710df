//! CLI command implementations
//!
//! This module contains all CLI command implementations. Each command returns
//! the process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success (skipped resources are warnings) |
//! | 1 | Completed, but the destination rejected rows |
//! | 2 | Configuration error |
//! | 4 | Destination connection or setup error |
//! | 5 | Fatal error |

pub mod init;
pub mod run;
pub mod validate;

/// Exit code: success
pub const EXIT_OK: i32 = 0;
/// Exit code: the run completed with failed rows
pub const EXIT_FAILED_ROWS: i32 = 1;
/// Exit code: configuration error
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: destination connection or setup error
pub const EXIT_DESTINATION: i32 = 4;
/// Exit code: fatal error
pub const EXIT_FATAL: i32 = 5;
