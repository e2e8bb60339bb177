use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) mod client;
pub mod prompt;
mod transport;

pub use client::{ChatOutcome, InferenceClient};
pub use transport::HttpTransport;

#[derive(Debug, Error)]
pub enum InferenceError {
    /// The service answered with an `error` field.
    #[error("{0}")]
    Service(String),
    /// The service could not be reached or did not answer in its protocol.
    #[error("{0}")]
    Transport(String),
}

/// Body of `POST {baseUrl}/api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// An `error` field wins over a `response` field.
    pub fn into_text(self) -> Result<String, InferenceError> {
        match (self.error, self.response) {
            (Some(error), _) => Err(InferenceError::Service(error)),
            (None, Some(text)) => Ok(text),
            (None, None) => Err(InferenceError::Transport(
                "response carried neither `response` nor `error`".to_string(),
            )),
        }
    }
}

/// One synchronous round trip to the generation endpoint.
pub trait Transport {
    fn generate(&self, url: &str, request: &GenerateRequest) -> Result<GenerateResponse, InferenceError>;
}
