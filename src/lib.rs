//! Lockstamp: last-write freshness tokens for shared, file-backed locks.
//!
//! Processes coordinating through a lock file stamp it with a new
//! [`LastWrite`] token on every write. Anybody holding an older token can
//! tell, with one small read and a byte comparison, whether the protected
//! resource changed since they last looked.
//!
//! ```no_run
//! use lockstamp::LockFile;
//!
//! let lock = LockFile::open("store.lock")?;
//!
//! let seen = lock.write()?.record_write()?;
//!
//! let (_, modified) = lock.read()?.modified_since(&seen)?;
//! assert!(!modified);
//! # Ok::<(), lockstamp::error::StampError>(())
//! ```

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod last_write;
pub mod lockfile;
pub mod logging;

#[cfg(test)]
mod test_support;

pub use last_write::{LAST_WRITE_SIZE, LastWrite};
pub use lockfile::{LockFile, ReadGuard, WriteGuard};
