use shared::error::ApiError;
use thiserror::Error;

/// Failures that can leave this core. Per-field validation results never
/// appear here; they stay in the error map published at the wizard-step
/// boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend rejected the request ({status}): {body}")]
    Api { status: u16, body: ApiError },
    #[error("could not decode backend response: {0}")]
    Decode(String),
    #[error("invalid API base url `{0}`")]
    BaseUrl(String),
    #[error("account created but picture upload failed: {0}")]
    PartialSubmission(String),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Network(err) if err.is_timeout())
    }
}
