//! # Storage Layer
//!
//! This module separates the "how" of storage from the "what". The
//! [`StorageBackend`] trait handles raw blob I/O — one serialized JSON array
//! per string key, mirroring the key-value store the original data was
//! migrated from. [`Collection`] handles the record logic on top: lookup,
//! uniqueness-checked inserts, typed patches, the soft-delete lifecycle,
//! search, and permanent removal.
//!
//! ## Write model
//!
//! `save_all` is the only write primitive. Every mutation is
//! load-all → transform in memory → save-all, so the last full write wins.
//! There is no partial persistence and no isolation between interleaved
//! callers; the library is single-threaded by design.
//!
//! ## Read model
//!
//! Reads fail open: an absent key or a malformed blob loads as an empty
//! collection. The parse failure is logged, never propagated, and the next
//! successful save overwrites the bad blob.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per collection under a
//!   data directory, written atomically (temp file, then rename).
//! - [`mem_backend::MemBackend`]: in-memory map for tests, with a
//!   write-error simulation toggle for failure paths.

pub mod backend;
pub mod collection;
pub mod fs_backend;
pub mod mem_backend;
pub mod stats;

pub use backend::StorageBackend;
pub use collection::Collection;
