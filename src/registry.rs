//! Cancellation registry for in-flight uploads
//!
//! Single source of truth for which upload handles are currently
//! cancellable. An entry exists exactly while a transfer for that handle
//! is in flight: the orchestrator inserts it when the transfer starts and
//! removes it on settlement, success or not. A cancel request looks up
//! the token and signals it without waiting for the transfer to stop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::types::UploadHandle;

/// Registry mapping upload handles to their cancellation tokens
///
/// Thread-safe; every operation takes the lock once so signal-and-remove
/// happens as one atomic step. Without that, a cancel could read a token
/// the instant before an unrelated unregister removes it.
#[derive(Debug, Default)]
pub struct CancelRegistry {
    tokens: Mutex<HashMap<UploadHandle, CancellationToken>>,
}

impl CancelRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Register a token for an in-flight upload
    ///
    /// A duplicate handle silently replaces the prior entry
    /// (last-register-wins). Callers are expected to mint handles that
    /// are never reused, e.g. via [`crate::HandleGenerator`].
    pub fn register(&self, handle: UploadHandle, token: CancellationToken) {
        self.tokens
            .lock()
            .expect("cancel registry lock poisoned")
            .insert(handle, token);
    }

    /// Look up the token for a handle, if one is live
    pub fn lookup(&self, handle: UploadHandle) -> Option<CancellationToken> {
        self.tokens
            .lock()
            .expect("cancel registry lock poisoned")
            .get(&handle)
            .cloned()
    }

    /// Remove a handle's entry
    ///
    /// No-op if the handle is absent; safe to call repeatedly.
    pub fn unregister(&self, handle: UploadHandle) {
        self.tokens
            .lock()
            .expect("cancel registry lock poisoned")
            .remove(&handle);
    }

    /// Signal cancellation for a handle and remove its entry
    ///
    /// Returns true if a live token was signalled. Cancelling an unknown
    /// or already-settled handle is a no-op, not an error.
    pub fn cancel(&self, handle: UploadHandle) -> bool {
        let token = self
            .tokens
            .lock()
            .expect("cancel registry lock poisoned")
            .remove(&handle);

        match token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Number of uploads currently in flight
    pub fn active_count(&self) -> usize {
        self.tokens
            .lock()
            .expect("cancel registry lock poisoned")
            .len()
    }
}

/// RAII guard that unregisters a handle when dropped
///
/// Ensures the registry entry is removed on every exit path of an upload,
/// including early returns and dropped futures.
pub struct RegistryGuard {
    registry: Arc<CancelRegistry>,
    handle: UploadHandle,
}

impl RegistryGuard {
    /// Create a guard that will unregister the handle on drop
    pub fn new(registry: Arc<CancelRegistry>, handle: UploadHandle) -> Self {
        Self { registry, handle }
    }

    /// Get the guarded handle
    pub fn handle(&self) -> UploadHandle {
        self.handle
    }
}

impl Drop for RegistryGuard {
    fn drop(&mut self) {
        self.registry.unregister(self.handle);
    }
}
