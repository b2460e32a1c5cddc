//! Shared lock files that carry a last-write token.
//!
//! A [`LockFile`] wraps an OS advisory lock on a file. Writers take the
//! exclusive lock, change the protected resource, and call
//! [`WriteGuard::record_write`], which stamps the lock file with a fresh
//! [`LastWrite`]. Readers take the shared lock and use
//! [`ReadGuard::modified_since`] to learn whether anybody wrote since the
//! token they kept from last time.
//!
//! # File Format
//!
//! The token occupies the first [`LAST_WRITE_SIZE`] bytes of the lock file.
//! Nothing else is stored. An empty file means no write has been recorded.
//!
//! # Threads
//!
//! Advisory locks belong to an open file, so two threads sharing one handle
//! would not exclude each other at the OS level. Each `LockFile` therefore
//! pairs the OS lock with an in-process `RwLock`, and counts readers so the
//! OS shared lock is taken by the first reader and dropped by the last.
//!
//! Guards release the lock when dropped. If unlocking fails, a warning is
//! logged but no panic occurs.

use crate::error::{Result, StampError};
use crate::last_write::{LAST_WRITE_SIZE, LastWrite};
use fs4::fs_std::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

#[derive(Debug)]
struct SharedState {
    file: File,
    /// Number of live `ReadGuard`s on this handle.
    readers: usize,
}

/// A lock file shared between processes.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    read_write: bool,
    rw: RwLock<()>,
    state: Mutex<SharedState>,
}

impl LockFile {
    /// Open a lock file for reading and writing, creating it if needed.
    ///
    /// Missing parent directories are created. Existing content is kept.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                StampError::IoError(format!(
                    "failed to create lock directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| {
                StampError::IoError(format!(
                    "failed to open lock file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self::new(path, file, true))
    }

    /// Open an existing lock file for reading only.
    ///
    /// Such a handle can take shared locks but never the write lock.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new().read(true).open(path).map_err(|e| {
            StampError::IoError(format!(
                "failed to open lock file '{}' read-only: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::new(path, file, false))
    }

    fn new(path: &Path, file: File, read_write: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            read_write,
            rw: RwLock::new(()),
            state: Mutex::new(SharedState { file, readers: 0 }),
        }
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this handle can take the write lock.
    pub fn is_read_write(&self) -> bool {
        self.read_write
    }

    /// Take the shared lock, blocking until it is available.
    pub fn read(&self) -> Result<ReadGuard<'_>> {
        let inner = self.rw.read().unwrap_or_else(|poison| poison.into_inner());

        let mut state = self.lock_state();
        if state.readers == 0 {
            FileExt::lock_shared(&state.file).map_err(|e| {
                StampError::LockError(format!(
                    "failed to take shared lock on '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;
            debug!(path = %self.path.display(), "acquired shared lock");
        }
        state.readers += 1;

        Ok(ReadGuard {
            lock: self,
            _inner: inner,
        })
    }

    /// Take the exclusive lock, blocking until it is available.
    ///
    /// Fails with `LockError` on a handle opened by [`LockFile::open_read_only`].
    pub fn write(&self) -> Result<WriteGuard<'_>> {
        if !self.read_write {
            return Err(StampError::LockError(format!(
                "lock file '{}' was opened read-only and cannot be write-locked",
                self.path.display()
            )));
        }

        let inner = self.rw.write().unwrap_or_else(|poison| poison.into_inner());

        let state = self.lock_state();
        FileExt::lock_exclusive(&state.file).map_err(|e| {
            StampError::LockError(format!(
                "failed to take exclusive lock on '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        debug!(path = %self.path.display(), "acquired exclusive lock");

        Ok(WriteGuard {
            lock: self,
            _inner: inner,
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    fn unlock(&self, file: &File) {
        match FileExt::unlock(file) {
            Ok(()) => debug!(path = %self.path.display(), "released lock"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to release lock"
            ),
        }
    }

    fn read_last_write(&self) -> Result<Option<LastWrite>> {
        let mut state = self.lock_state();
        let file = &mut state.file;

        file.seek(SeekFrom::Start(0)).map_err(|e| self.io_error("seek", e))?;

        let mut contents = Vec::with_capacity(LAST_WRITE_SIZE);
        Read::by_ref(file)
            .take(LAST_WRITE_SIZE as u64)
            .read_to_end(&mut contents)
            .map_err(|e| self.io_error("read", e))?;

        if contents.is_empty() {
            return Ok(None);
        }
        Ok(Some(LastWrite::from_serialized(&contents)))
    }

    fn modified_since(&self, previous: &LastWrite) -> Result<(Option<LastWrite>, bool)> {
        assert!(
            previous.is_initialized(),
            "modified_since with an uninitialized previous value"
        );

        let current = self.read_last_write()?;
        let modified = match &current {
            Some(current) => !current.equals(previous),
            None => true,
        };
        Ok((current, modified))
    }

    fn record_write(&self) -> Result<LastWrite> {
        let lw = LastWrite::generate();

        let mut state = self.lock_state();
        let file = &mut state.file;

        file.seek(SeekFrom::Start(0)).map_err(|e| self.io_error("seek", e))?;
        file.write_all(lw.serialize())
            .map_err(|e| self.io_error("write", e))?;
        file.sync_data().map_err(|e| self.io_error("sync", e))?;

        debug!(path = %self.path.display(), last_write = %lw, "recorded write");
        Ok(lw)
    }

    fn io_error(&self, op: &str, e: std::io::Error) -> StampError {
        StampError::IoError(format!(
            "failed to {} lock file '{}': {}",
            op,
            self.path.display(),
            e
        ))
    }
}

/// RAII guard for the shared lock.
#[derive(Debug)]
pub struct ReadGuard<'a> {
    lock: &'a LockFile,
    _inner: RwLockReadGuard<'a, ()>,
}

impl ReadGuard<'_> {
    /// The token currently stored in the lock file, or `None` if no write
    /// has been recorded yet.
    pub fn last_write(&self) -> Result<Option<LastWrite>> {
        self.lock.read_last_write()
    }

    /// Compare the stored token with `previous`.
    ///
    /// Returns the current token and whether it differs. A lock file with no
    /// recorded write counts as modified.
    ///
    /// # Panics
    ///
    /// Panics if `previous` is the uninitialized placeholder.
    pub fn modified_since(&self, previous: &LastWrite) -> Result<(Option<LastWrite>, bool)> {
        self.lock.modified_since(previous)
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.lock.lock_state();
        state.readers -= 1;
        if state.readers == 0 {
            self.lock.unlock(&state.file);
        }
    }
}

/// RAII guard for the exclusive lock.
#[derive(Debug)]
pub struct WriteGuard<'a> {
    lock: &'a LockFile,
    _inner: RwLockWriteGuard<'a, ()>,
}

impl WriteGuard<'_> {
    /// Stamp the lock file with a new token and return it.
    ///
    /// Call once per change to the protected resource.
    pub fn record_write(&self) -> Result<LastWrite> {
        self.lock.record_write()
    }

    /// See [`ReadGuard::last_write`].
    pub fn last_write(&self) -> Result<Option<LastWrite>> {
        self.lock.read_last_write()
    }

    /// See [`ReadGuard::modified_since`].
    pub fn modified_since(&self, previous: &LastWrite) -> Result<(Option<LastWrite>, bool)> {
        self.lock.modified_since(previous)
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        let state = self.lock.lock_state();
        self.lock.unlock(&state.file);
    }
}
