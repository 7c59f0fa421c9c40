//! Upload orchestrator
//!
//! Owns the loading/error state for upload calls and is the only
//! component that creates or clears cancellation registry entries. Each
//! upload follows the same sequence: mint a fresh token, register it
//! under the file's handle, invoke the transport, unregister on
//! settlement. A caller holding the handle can independently request
//! cancellation at any point while the transfer is in flight.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::TransferError;
use crate::registry::{CancelRegistry, RegistryGuard};
use crate::transport::FileTransfer;
use crate::types::{
    FileAction, GroupOutcome, ProgressCallback, TransferRequest, UploadFile, UploadGroup,
    UploadHandle,
};
use crate::FALLBACK_ERROR_MESSAGE;

/// Orchestrates single and batched file uploads over a [`FileTransfer`]
/// transport
///
/// The orchestrator exposes per-call observable state: `loading` is true
/// while a call is in flight, and `last_error` holds the most recent
/// failure message. Both are reset at the start of each call. A returned
/// identifier (or mapping) is the sole success signal; after a `None`
/// result the host inspects `last_error` to decide whether to notify.
pub struct Uploader<T: FileTransfer + 'static> {
    transport: Arc<T>,
    registry: Arc<CancelRegistry>,
    loading: AtomicBool,
    error: Mutex<Option<String>>,
}

impl<T: FileTransfer + 'static> Uploader<T> {
    /// Create an uploader with its own private registry
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_registry(transport, Arc::new(CancelRegistry::new()))
    }

    /// Create an uploader over an injected registry
    ///
    /// Lets the composing component (or a test) own the registry and
    /// share it with other observers.
    pub fn with_registry(transport: Arc<T>, registry: Arc<CancelRegistry>) -> Self {
        Self {
            transport,
            registry,
            loading: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }

    /// Whether an upload call is currently in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Error message from the most recent failed call, if any
    ///
    /// Cancelled transfers do not set this; cancellation is an expected
    /// outcome, not a user-facing error.
    pub fn last_error(&self) -> Option<String> {
        self.error
            .lock()
            .expect("uploader error state lock poisoned")
            .clone()
    }

    fn set_error(&self, message: Option<String>) {
        *self
            .error
            .lock()
            .expect("uploader error state lock poisoned") = message;
    }

    /// Upload a single file
    ///
    /// Registers a cancellation token under the file's handle for the
    /// duration of the transfer, then invokes the transport with the
    /// given action verb. Returns the stored file's identifier on
    /// success, or `None` on failure or cancellation; only
    /// non-cancellation failures set `last_error`.
    pub async fn upload_single(
        &self,
        file: UploadFile,
        on_progress: Option<ProgressCallback>,
        action: FileAction,
        existing_file_id: Option<String>,
    ) -> Option<String> {
        self.loading.store(true, Ordering::SeqCst);
        self.set_error(None);

        let result = run_transfer(
            Arc::clone(&self.transport),
            Arc::clone(&self.registry),
            file,
            on_progress,
            action,
            existing_file_id,
        )
        .await;

        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(id) => id,
            Err(err) if err.is_cancelled() => {
                tracing::debug!(error = %err, "upload cancelled");
                None
            }
            Err(err) => {
                let message = if err.message.is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    err.message.clone()
                };
                tracing::debug!(kind = err.kind, error = %message, "upload failed");
                self.set_error(Some(message));
                None
            }
        }
    }

    /// Upload labeled groups of files
    ///
    /// Groups run in input order. Within a group, files flagged
    /// already-stored are filtered out before any transfer starts and the
    /// rest are uploaded concurrently; identifiers are collected in
    /// completion order, which is not guaranteed to match submission
    /// order. Files that fail or are cancelled are dropped from the
    /// group's result without affecting siblings.
    ///
    /// Returns `None` only if the batch itself fails (a panicked upload
    /// task); per-group results computed up to that point are discarded
    /// and `last_error` is set.
    pub async fn upload_many(
        &self,
        groups: Vec<UploadGroup>,
    ) -> Option<HashMap<String, GroupOutcome>> {
        self.loading.store(true, Ordering::SeqCst);
        self.set_error(None);

        let mut results = HashMap::new();
        let mut batch_failure: Option<String> = None;

        'groups: for group in groups {
            let mut tasks = JoinSet::new();
            for file in group.files.into_iter().filter(|f| !f.already_stored) {
                let transport = Arc::clone(&self.transport);
                let registry = Arc::clone(&self.registry);
                tasks.spawn(async move {
                    run_transfer(transport, registry, file, None, FileAction::Add, None).await
                });
            }

            let mut ids = Vec::new();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(Ok(Some(id))) => ids.push(id),
                    // Success with no identifier contributes nothing
                    Ok(Ok(None)) => {}
                    Ok(Err(err)) => {
                        // Dropped from the group result; reason kept for logs
                        tracing::debug!(
                            label = %group.label,
                            kind = err.kind,
                            error = %err.message,
                            "file dropped from batch result"
                        );
                    }
                    Err(join_err) => {
                        batch_failure = Some(format!("upload task failed: {join_err}"));
                        tasks.abort_all();
                        break 'groups;
                    }
                }
            }

            results.insert(group.label, GroupOutcome::from_ids(ids));
        }

        self.loading.store(false, Ordering::SeqCst);

        if let Some(message) = batch_failure {
            tracing::debug!(error = %message, "batch upload aborted");
            self.set_error(Some(message));
            return None;
        }
        Some(results)
    }

    /// Request cancellation of an in-flight upload
    ///
    /// Fire-and-forget: signals the handle's token if one is live and
    /// reports success either way. The caller gets no confirmation that
    /// the transfer actually stopped, only that the signal was delivered
    /// or that there was nothing to stop.
    pub fn cancel(&self, handle: UploadHandle) -> bool {
        let signalled = self.registry.cancel(handle);
        tracing::debug!(%handle, signalled, "cancel requested");
        true
    }

    /// The cancellation registry backing this uploader
    pub fn registry(&self) -> &Arc<CancelRegistry> {
        &self.registry
    }
}

/// Run one transfer with its registry entry held for the duration
///
/// The entry is removed when the guard drops, on every exit path
/// including a dropped future.
async fn run_transfer<T: FileTransfer>(
    transport: Arc<T>,
    registry: Arc<CancelRegistry>,
    file: UploadFile,
    on_progress: Option<ProgressCallback>,
    action: FileAction,
    existing_file_id: Option<String>,
) -> Result<Option<String>, TransferError> {
    let token = CancellationToken::new();
    registry.register(file.handle, token.clone());
    let _guard = RegistryGuard::new(registry, file.handle);

    let request = TransferRequest {
        action,
        file,
        on_progress,
        cancel: token,
        existing_file_id,
    };

    let response = transport.transfer(request).await?;
    Ok(response.id)
}
