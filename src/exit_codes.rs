//! Exit code constants for the lockstamp CLI.
//!
//! - 0: Success (for `check`: the lock file is unchanged)
//! - 1: User error (bad args, bad config, malformed token)
//! - 2: Modified (`check` saw a different last-write token)
//! - 3: I/O failure on the lock or config file
//! - 4: Lock acquisition failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid config, or malformed token.
pub const USER_ERROR: i32 = 1;

/// The lock file was written since the given token.
pub const MODIFIED: i32 = 2;

/// I/O failure while reading or writing the lock file or config.
pub const IO_FAILURE: i32 = 3;

/// Lock acquisition failure.
pub const LOCK_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, MODIFIED, IO_FAILURE, LOCK_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(USER_ERROR, 1);
        assert_eq!(MODIFIED, 2);
        assert_eq!(IO_FAILURE, 3);
        assert_eq!(LOCK_FAILURE, 4);
    }
}
