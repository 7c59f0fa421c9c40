//! Machine-readable error kinds for transfer failures
//!
//! The transfer transport reports failures with both a human-readable
//! message and a machine-readable kind string. The orchestrator only
//! branches on the `cancelled` kind (a cancelled transfer is an expected
//! outcome, not an error); the remaining kinds exist so the original
//! failure reason stays available for logging after the public result
//! shape has discarded it.

/// Transfer was stopped by a cancel request while in flight
pub const ERROR_KIND_CANCELLED: &str = "cancelled";

/// Network-level failure reaching the transfer service
pub const ERROR_KIND_CONNECTION: &str = "connection_error";

/// The transfer service rejected the request
pub const ERROR_KIND_SERVER: &str = "server_error";

/// Malformed or unexpected response from the transfer service
pub const ERROR_KIND_PROTOCOL: &str = "protocol_error";

/// Failure that doesn't fit a more specific kind
pub const ERROR_KIND_UNKNOWN: &str = "unknown";

/// Error type for transfer operations
///
/// Pairs a human-readable message with a machine-readable kind so the
/// orchestrator can classify failures without parsing message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferError {
    /// Human-readable error message
    pub message: String,
    /// Machine-readable error kind (e.g., "cancelled", "connection_error")
    pub kind: &'static str,
}

impl TransferError {
    /// Create a new transfer error
    pub fn new(message: impl Into<String>, kind: &'static str) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Create a "cancelled" error (cancel request observed mid-transfer)
    pub fn cancelled() -> Self {
        Self::new("transfer cancelled", ERROR_KIND_CANCELLED)
    }

    /// Create a "connection_error" error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(message, ERROR_KIND_CONNECTION)
    }

    /// Create a "server_error" error
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(message, ERROR_KIND_SERVER)
    }

    /// Create a "protocol_error" error
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::new(message, ERROR_KIND_PROTOCOL)
    }

    /// Create an "unknown" error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(message, ERROR_KIND_UNKNOWN)
    }

    /// Whether this failure was a cooperative cancellation
    ///
    /// Classification is by kind, never by message text.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind == ERROR_KIND_CANCELLED
    }
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl std::error::Error for TransferError {}
