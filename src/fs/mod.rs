//! Filesystem utilities for lockstamp.

pub mod atomic;

pub use atomic::atomic_write;
