//! Error taxonomy of the pricing pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValuationError {
    /// Transport failure or non-success status while talking to the FX source.
    #[error("Network error: {0}")]
    Network(String),

    /// Payload could not be understood.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Transport failure on an authenticated prediction call.
    #[error("Prediction backend unreachable: {0}")]
    BackendUnreachable(String),

    /// The prediction service answered with a non-success status.
    #[error("Prediction rejected with status {status}: {body}")]
    RemoteRejected { status: u16, body: String },

    #[error("Unknown country code: {0}")]
    UnknownCountry(String),
}

impl ValuationError {
    /// Whether the user can act on this error by checking the backend or credential.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ValuationError::BackendUnreachable(_) | ValuationError::RemoteRejected { .. }
        )
    }
}
