//! Transfer transport boundary
//!
//! The actual byte transfer is performed by the host application; this
//! crate only orchestrates it. The transport receives the cancellation
//! token minted for the attempt and must observe it cooperatively,
//! reporting the abort with a cancelled-kind error so the orchestrator
//! can tell it apart from a network failure.

use async_trait::async_trait;

use crate::error::TransferError;
use crate::types::{TransferRequest, TransferResponse};

/// Single-file transfer primitive provided by the host application
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Transfer one file
    ///
    /// On success the response may carry the stored file's identifier.
    /// Failures are reported with a machine-readable kind;
    /// [`TransferError::cancelled`] is reserved for transfers stopped via
    /// the request's cancellation token.
    async fn transfer(&self, request: TransferRequest) -> Result<TransferResponse, TransferError>;
}
