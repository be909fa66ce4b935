//! Lazily prepared call handles, one slot per [`CallKind`].
//!
//! Each slot moves `UNCREATED → PREPARED` on first use and back to
//! `UNCREATED` on [`HandleCache::invalidate_all`]. A handle whose call failed
//! is *not* evicted; only an explicit invalidation forgets it.
//!
//! The cache holds no lock of its own. It lives next to the connection
//! inside the loader's mutex, so creation and invalidation can never race.

use tracing::{debug, warn};

use crate::application::ports::{BackendError, Connection};
use crate::domain::{CallKind, DomainError, LoaderCalls};

/// Cache of prepared handles for one connection.
#[derive(Debug)]
pub struct HandleCache<H> {
    slots: [Option<H>; 3],
    created_total: u64,
}

impl<H> HandleCache<H> {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None],
            created_total: 0,
        }
    }

    /// Return the cached handle for `kind`, preparing the matching call from
    /// `calls` on `connection` first if the slot is empty.
    ///
    /// A failed preparation leaves the slot empty, as does asking for a
    /// check call that is disabled.
    pub fn get_or_create<C>(
        &mut self,
        connection: &mut C,
        calls: &LoaderCalls,
        kind: CallKind,
    ) -> Result<&mut H, BackendError>
    where
        C: Connection<Handle = H>,
    {
        let idx = kind.index();
        let handle = match self.slots[idx].take() {
            Some(handle) => handle,
            None => {
                let descriptor = calls
                    .descriptor(kind)
                    .ok_or(DomainError::CallNotConfigured { kind })?;
                debug!(%kind, call = %descriptor, "preparing call");
                let handle = connection.prepare_call(descriptor)?;
                self.created_total += 1;
                handle
            }
        };
        Ok(self.slots[idx].insert(handle))
    }

    /// Close and forget every cached handle. Close failures are logged and
    /// ignored. Returns the number of handles dropped.
    pub fn invalidate_all<C>(&mut self, connection: &mut C) -> usize
    where
        C: Connection<Handle = H>,
    {
        let mut dropped = 0;
        for kind in CallKind::ALL {
            if let Some(handle) = self.slots[kind.index()].take() {
                dropped += 1;
                if let Err(e) = connection.close_call(handle) {
                    warn!(%kind, error = %e, "failed to close call handle; ignoring");
                }
            }
        }
        dropped
    }

    pub fn is_prepared(&self, kind: CallKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Handles currently cached.
    pub fn prepared_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Handles prepared over the lifetime of this cache.
    pub fn created_total(&self) -> u64 {
        self.created_total
    }
}

impl<H> Default for HandleCache<H> {
    fn default() -> Self {
        Self::new()
    }
}
