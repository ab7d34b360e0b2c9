use std::time::Duration;
use thiserror::Error;

use crate::service::Service;

/// Error a check primitive may attach to its outcome.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure of a fingerprint probe's connection step.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to connect: {0}")]
    Connect(#[from] std::io::Error),
    #[error("connection refused by {0}")]
    Refused(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("{0} checker needs target-specific state, use the matching binding")]
    NeedsBinding(Service),
    #[error("no fingerprint probe configured for {0}")]
    MissingProbe(Service),
}
