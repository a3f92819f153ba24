//! Error type surfaced by the runtime API.
//!
//! Wraps failures of worker coordination and construction errors returned by
//! the operation factory so clients can bubble them up with one type.
use thiserror::Error;
use tokio::sync::oneshot;

use crate::operation::OperationError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("scheduler worker command channel closed")]
    CommandChannelClosed,

    #[error("scheduler worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("scheduler worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("operation rejected: {0}")]
    Rejected(#[from] OperationError),
}
