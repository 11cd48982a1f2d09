//! Lock-free and locked access to a [`File`].
//!
//! A plain `File` relies on the borrow checker: shared borrows read, a unique
//! borrow writes, and no lock is taken. A [`SharedFile`] puts the document
//! behind an `Arc<RwLock<_>>` so clones can be handed to other threads;
//! readers run concurrently and a writer is exclusive.
//!
//! Code that should work in either mode takes an [`Access`]:
//!
//! ```rust
//! use csgo_cfg::Access;
//!
//! fn bot_quota<A: Access>(cfg: &A) -> Option<String> {
//!     cfg.read().key("", "bot_quota").map(|k| k.value().to_string())
//! }
//!
//! let cfg = csgo_cfg::load("bot_quota 10").unwrap();
//! assert_eq!(bot_quota(&cfg).as_deref(), Some("10"));
//! let shared = cfg.into_shared();
//! assert_eq!(bot_quota(&shared).as_deref(), Some("10"));
//! ```

use crate::File;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Read and write capability over a [`File`], locked or not.
pub trait Access {
    type Read<'a>: Deref<Target = File>
    where
        Self: 'a;
    type Write<'a>: DerefMut<Target = File>
    where
        Self: 'a;

    fn read(&self) -> Self::Read<'_>;
    fn write(&mut self) -> Self::Write<'_>;
}

impl Access for File {
    type Read<'a> = &'a File;
    type Write<'a> = &'a mut File;

    fn read(&self) -> Self::Read<'_> {
        self
    }

    fn write(&mut self) -> Self::Write<'_> {
        self
    }
}

/// A [`File`] guarded by a reader/writer lock. Cloning shares the document.
#[derive(Debug, Clone, Default)]
pub struct SharedFile {
    inner: Arc<RwLock<File>>,
}

impl SharedFile {
    #[must_use]
    pub fn new(file: File) -> Self {
        SharedFile {
            inner: Arc::new(RwLock::new(file)),
        }
    }

    /// Takes the read lock. A lock poisoned by a panicking writer is still
    /// handed out, since every write leaves the document consistent.
    pub fn read(&self) -> RwLockReadGuard<'_, File> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the write lock.
    pub fn write(&self) -> RwLockWriteGuard<'_, File> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the document, or `self` back if other clones are still alive.
    pub fn into_inner(self) -> Result<File, SharedFile> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => Ok(lock.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(inner) => Err(SharedFile { inner }),
        }
    }
}

impl From<File> for SharedFile {
    fn from(file: File) -> Self {
        SharedFile::new(file)
    }
}

impl Access for SharedFile {
    type Read<'a> = RwLockReadGuard<'a, File>;
    type Write<'a> = RwLockWriteGuard<'a, File>;

    fn read(&self) -> Self::Read<'_> {
        SharedFile::read(self)
    }

    fn write(&mut self) -> Self::Write<'_> {
        SharedFile::write(self)
    }
}
