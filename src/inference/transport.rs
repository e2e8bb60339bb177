use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use super::{GenerateRequest, GenerateResponse, InferenceError, Transport};

/// Talks to the inference service over HTTP with no request timeout.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| InferenceError::Transport(format!("failed to build http client: {e}")))?;

        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn generate(&self, url: &str, request: &GenerateRequest) -> Result<GenerateResponse, InferenceError> {
        debug!(url, model = %request.model, prompt_len = request.prompt.len(), "sending generate request");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        // Error statuses still carry `{"error": ...}` bodies worth showing.
        serde_json::from_str::<GenerateResponse>(&body).map_err(|e| {
            warn!(status = status.as_u16(), error = %e, "unparsable generate response");
            InferenceError::Transport(format!(
                "unexpected response (HTTP {}): {}",
                status.as_u16(),
                body.chars().take(240).collect::<String>()
            ))
        })
    }
}
