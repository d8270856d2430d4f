//! Shared handle over a single medium
//!
//! Regions over disjoint byte ranges are independent, but they still sit on the
//! same physical medium. Each engine owns a clone of the handle; every byte
//! access takes the medium's lock for the duration of that access only.

use super::RawStore;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, thread-safe handle to a medium
pub struct SharedStore<S> {
    inner: Arc<Mutex<S>>,
}

impl<S: RawStore> SharedStore<S> {
    /// Wrap `store` so it can be handed to several engines
    pub fn new(store: S) -> Self {
        SharedStore {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the underlying medium
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        SharedStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RawStore> RawStore for SharedStore<S> {
    fn len(&self) -> usize {
        self.inner.lock().len()
    }

    fn read(&self, addr: usize) -> u8 {
        self.inner.lock().read(addr)
    }

    fn write(&mut self, addr: usize, data: u8) {
        self.inner.lock().write(addr, data)
    }
}

impl<S> std::fmt::Debug for SharedStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}
