//! Types for upload transfer management
//!
//! These types describe one upload attempt (handle, file bytes, action
//! verb), the grouped batch input, and the result shapes handed back to
//! the host page.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

// =============================================================================
// Upload Handle
// =============================================================================

/// Unique identifier for one upload attempt
///
/// Handles are caller-supplied and must be unique for the lifetime of the
/// attempt; they are never reused across attempts. [`HandleGenerator`]
/// provides the supported generation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadHandle(u64);

impl UploadHandle {
    /// Get the inner handle value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for UploadHandle {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for UploadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic handle generator
///
/// Guarantees that no handle is ever handed out twice, which is what makes
/// the registry's last-register-wins insert safe in practice.
#[derive(Debug)]
pub struct HandleGenerator {
    next: AtomicU64,
}

impl HandleGenerator {
    /// Create a generator starting at handle 1
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Mint the next unique handle
    pub fn next(&self) -> UploadHandle {
        UploadHandle(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for HandleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// File Action
// =============================================================================

/// Verb passed through to the transfer service
///
/// The verb set is a pass-through contract; the orchestrator does not
/// validate which verb applies to which request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FileAction {
    /// Store a new file
    #[default]
    Add,
    /// Replace the contents of an existing stored file
    Replace,
    /// Remove an existing stored file
    Delete,
}

impl FileAction {
    /// Convert to the string representation used on the wire
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Replace => "Replace",
            Self::Delete => "Delete",
        }
    }

    /// Parse from the wire representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Add" => Some(Self::Add),
            "Replace" => Some(Self::Replace),
            "Delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Upload Inputs
// =============================================================================

/// One file queued for upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Unique handle for this upload attempt
    pub handle: UploadHandle,
    /// Display name of the file
    pub name: String,
    /// Raw file bytes
    pub data: Vec<u8>,
    /// Whether the file is already persisted server-side and unmodified
    ///
    /// Batch uploads filter these out before any transfer starts.
    pub already_stored: bool,
}

impl UploadFile {
    /// Create a new file pending upload
    pub fn new(handle: impl Into<UploadHandle>, name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            handle: handle.into(),
            name: name.into(),
            data,
            already_stored: false,
        }
    }

    /// Create a file that is already persisted server-side
    pub fn stored(handle: impl Into<UploadHandle>, name: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            name: name.into(),
            data: Vec::new(),
            already_stored: true,
        }
    }

    /// Byte count, used for progress reporting
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A labeled bundle of files uploaded together and reported together
#[derive(Debug, Clone)]
pub struct UploadGroup {
    /// Caller-supplied grouping key
    pub label: String,
    /// Files in submission order
    pub files: Vec<UploadFile>,
}

impl UploadGroup {
    /// Create a new group
    pub fn new(label: impl Into<String>, files: Vec<UploadFile>) -> Self {
        Self {
            label: label.into(),
            files,
        }
    }
}

// =============================================================================
// Batch Outcome
// =============================================================================

/// Per-label result of a batch upload
///
/// Serializes untagged so the host page's RPC layer sees the original
/// wire shape: a single identifier, a list of identifiers, or null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupOutcome {
    /// No file in the group uploaded successfully
    Empty,
    /// Exactly one file uploaded successfully
    Single(String),
    /// More than one file uploaded successfully, in completion order
    Multiple(Vec<String>),
}

impl GroupOutcome {
    /// Collapse a list of successful identifiers into the public shape
    pub(crate) fn from_ids(mut ids: Vec<String>) -> Self {
        match ids.len() {
            0 => Self::Empty,
            1 => Self::Single(ids.remove(0)),
            _ => Self::Multiple(ids),
        }
    }

    /// Returns true if no file in the group uploaded successfully
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

// =============================================================================
// Transport Request / Response
// =============================================================================

/// Percent-complete callback invoked by the transport during streaming
pub type ProgressCallback = Box<dyn Fn(f32) + Send + Sync>;

/// Request handed to the transfer transport for one file
pub struct TransferRequest {
    /// Verb for the transfer service
    pub action: FileAction,
    /// The file to transfer
    pub file: UploadFile,
    /// Optional progress callback (single-file uploads only)
    pub on_progress: Option<ProgressCallback>,
    /// Cooperative stop signal; the transport must observe this and abort
    pub cancel: CancellationToken,
    /// Identifier of the stored file when the action targets one
    pub existing_file_id: Option<String>,
}

impl std::fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferRequest")
            .field("action", &self.action)
            .field("file", &self.file.handle)
            .field("size", &self.file.size())
            .field("has_progress", &self.on_progress.is_some())
            .field("existing_file_id", &self.existing_file_id)
            .finish()
    }
}

/// Response from the transfer transport
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResponse {
    /// Identifier of the stored file, if the service returned one
    ///
    /// A missing identifier is success-with-no-id, not an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================
