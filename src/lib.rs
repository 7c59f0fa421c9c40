//! Portal Transfers
//!
//! Upload transfer management for the portal's file attachments: a
//! per-upload cancellation registry paired with an orchestrator that
//! issues single or batched uploads, tracks loading/error state, and
//! tells user-cancelled transfers apart from failures.
//!
//! The actual byte transfer is out of scope; the host application
//! provides it behind the [`FileTransfer`] trait and this crate drives
//! it with a cooperative cancellation token per attempt.
//!
//! Key types:
//! - [`Uploader`] - issues uploads and owns per-call observable state
//! - [`CancelRegistry`] - maps in-flight handles to cancellation tokens
//! - [`FileTransfer`] - the transport boundary the host implements
//! - [`GroupOutcome`] - per-label result shape of a batch upload

mod error;
mod registry;
mod transport;
mod types;
mod uploader;

pub use error::{
    ERROR_KIND_CANCELLED, ERROR_KIND_CONNECTION, ERROR_KIND_PROTOCOL, ERROR_KIND_SERVER,
    ERROR_KIND_UNKNOWN, TransferError,
};
pub use registry::{CancelRegistry, RegistryGuard};
pub use transport::FileTransfer;
pub use types::{
    FileAction, GroupOutcome, HandleGenerator, ProgressCallback, TransferRequest, TransferResponse,
    UploadFile, UploadGroup, UploadHandle,
};
pub use uploader::Uploader;

/// Error message shown when a failed transfer carries no message of its own
pub const FALLBACK_ERROR_MESSAGE: &str = "File upload failed";
