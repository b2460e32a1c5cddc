//! Last-write tokens for shared lock files.
//!
//! A [`LastWrite`] is an opaque identifier of the most recent write made under
//! a lock file. Writers mint a fresh one with [`LastWrite::generate`] every time
//! they change the protected resource and store its bytes in the lock file.
//! Readers keep the token they last saw and compare it against the one
//! currently stored to find out whether anybody, in this process or another,
//! has written since.
//!
//! # Token Layout
//!
//! Tokens are always [`LAST_WRITE_SIZE`] bytes when generated here:
//! - `[0, 8)`: wall-clock time in nanoseconds since the Unix epoch
//! - `[8, 16)`: per-process counter, bumped atomically on every generation
//! - `[16, 20)`: process ID
//! - `[20, 64)`: bytes from the operating system's secure random source
//!
//! All integers are little-endian. The layout is not part of the contract:
//! tokens read back from disk are never parsed, only compared byte for byte,
//! so lock files written by other implementations keep working as long as
//! they use the same region size.
//!
//! # Misuse
//!
//! The placeholder produced by [`LastWrite::default`] stands for "no token".
//! Serializing or comparing it is a bug in the caller and panics.

use crate::error::{Result, StampError};
use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Size of the token region reserved in lock files.
///
/// This must never change: processes running different builds share the same
/// lock files.
pub const LAST_WRITE_SIZE: usize = 64;

const TIMESTAMP_RANGE: std::ops::Range<usize> = 0..8;
const COUNTER_RANGE: std::ops::Range<usize> = 8..16;
const PID_RANGE: std::ops::Range<usize> = 16..20;
const RANDOM_OFFSET: usize = 20;

/// Process-wide generation counter. Only touched by [`LastWrite::generate`].
static LAST_WRITER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Opaque identifier of the last write to a lock file.
///
/// Has value semantics: clones are independent and the bytes never change
/// after construction.
#[derive(Clone, Default)]
pub struct LastWrite {
    state: Option<Box<[u8]>>,
}

impl LastWrite {
    /// Generate a new token, distinct from every token generated before.
    ///
    /// # Panics
    ///
    /// Panics if the operating system's secure random source fails. A token
    /// without its random part is not safe to hand out.
    pub fn generate() -> Self {
        Self::generate_with(getrandom::getrandom)
    }

    /// Generation with an injectable random source.
    fn generate_with<F>(fill_random: F) -> Self
    where
        F: FnOnce(&mut [u8]) -> std::result::Result<(), getrandom::Error>,
    {
        // Times past 2262 do not fit in i64 nanoseconds; the counter and the
        // random part still keep tokens unique.
        let tm = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
        let counter = LAST_WRITER_ID_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
        let pid = std::process::id();

        let mut res = vec![0u8; LAST_WRITE_SIZE];
        res[TIMESTAMP_RANGE].copy_from_slice(&tm.to_le_bytes());
        res[COUNTER_RANGE].copy_from_slice(&counter.to_le_bytes());
        res[PID_RANGE].copy_from_slice(&pid.to_le_bytes());
        if let Err(e) = fill_random(&mut res[RANDOM_OFFSET..]) {
            panic!("secure random source failed while generating a last-write token: {}", e);
        }

        Self {
            state: Some(res.into_boxed_slice()),
        }
    }

    /// Wrap bytes previously produced by [`LastWrite::serialize`].
    ///
    /// The bytes are taken verbatim; neither their length nor their internal
    /// structure is checked.
    pub fn from_serialized(serialized: &[u8]) -> Self {
        Self {
            state: Some(serialized.into()),
        }
    }

    /// Parse a token from its hex representation.
    ///
    /// Intended for tokens passed around by humans or scripts, so unlike
    /// [`LastWrite::from_serialized`] bad input is a recoverable error.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StampError::UserError(
                "last-write token must not be empty".to_string(),
            ));
        }

        let bytes = hex::decode(s).map_err(|e| {
            StampError::UserError(format!("invalid last-write token '{}': {}", s, e))
        })?;
        Ok(Self::from_serialized(&bytes))
    }

    /// Whether this is a real token rather than the default placeholder.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Bytes to store in the lock file for this token.
    ///
    /// # Panics
    ///
    /// Panics if called on the uninitialized placeholder.
    pub fn serialize(&self) -> &[u8] {
        match &self.state {
            Some(state) => &state[..],
            None => panic!("LastWrite::serialize on an uninitialized value"),
        }
    }

    /// Hex encoding of [`LastWrite::serialize`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    /// Whether `self` and `other` identify the same write.
    ///
    /// # Panics
    ///
    /// Panics if either token is the uninitialized placeholder.
    pub fn equals(&self, other: &LastWrite) -> bool {
        let Some(state) = &self.state else {
            panic!("LastWrite::equals on an uninitialized value");
        };
        let Some(other_state) = &other.state else {
            panic!("LastWrite::equals with an uninitialized counterparty");
        };
        state == other_state
    }
}

impl fmt::Debug for LastWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => f.debug_tuple("LastWrite").field(&hex::encode(state)).finish(),
            None => f.write_str("LastWrite(<uninitialized>)"),
        }
    }
}

impl fmt::Display for LastWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => f.write_str(&hex::encode(state)),
            None => f.write_str("<uninitialized>"),
        }
    }
}
