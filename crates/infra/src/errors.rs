//! Infrastructure error wrapping
//!
//! Foreign error types are funneled into the domain error through a thin
//! newtype so repositories can use `?` without bespoke map_err chains.

use rollcall_domain::RollcallError;
use thiserror::Error;

/// Wrapper that carries a domain error across infra boundaries.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub RollcallError);

impl From<InfraError> for RollcallError {
    fn from(err: InfraError) -> Self {
        err.0
    }
}

impl From<rusqlite::Error> for InfraError {
    fn from(err: rusqlite::Error) -> Self {
        Self(RollcallError::Database(err.to_string()))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        Self(RollcallError::Database(format!("pool error: {err}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        Self(RollcallError::Database(format!("stored column decode failed: {err}")))
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(err: reqwest::Error) -> Self {
        Self(RollcallError::Notification(err.to_string()))
    }
}
