use chrono::Utc;
use tracing::{info, warn};

use super::{prompt, GenerateRequest, InferenceError, Transport};
use crate::core::config::ConnectionConfig;
use crate::input::{ChatHistory, ChatTurn, HistoryError};
use crate::process::{NullSink, ProcessRunner};

/// Result of one chat exchange.
#[derive(Debug)]
pub struct ChatOutcome {
    pub reply: Result<ChatTurn, InferenceError>,
    /// History writes that failed along the way.
    pub unsaved: Vec<HistoryError>,
}

/// Sends chat messages and error explanations to the inference service.
///
/// Holds no session state: config and chat history are passed in per call.
pub struct InferenceClient<T, R> {
    transport: T,
    runner: R,
}

impl<T, R> InferenceClient<T, R>
where
    T: Transport,
    R: ProcessRunner,
{
    pub fn new(transport: T, runner: R) -> Self {
        InferenceClient { transport, runner }
    }

    /// Preamble with the time, a listing of the working directory, and the
    /// answer-style instructions. The listing run is never recorded.
    pub fn build_context(&self) -> String {
        let listing = match self.runner.run(prompt::LISTING_COMMAND, &mut NullSink) {
            Ok(output) if output.exit_code == 0 => output.stdout,
            Ok(output) => format!("Error executing command: {}", output.stderr),
            Err(e) => format!("Error executing command: {e}"),
        };

        prompt::context_block(Utc::now(), &listing)
    }

    /// The user turn is recorded before the request goes out; the assistant
    /// turn only when the service actually answered. A history write that
    /// fails is reported in the outcome and the exchange goes on.
    pub fn chat(
        &self,
        message: &str,
        config: &ConnectionConfig,
        history: &mut ChatHistory,
    ) -> ChatOutcome {
        let mut unsaved = Vec::new();

        if let Err(e) = history.append(ChatTurn::user(message)) {
            warn!(error = %e, "user turn not persisted");
            unsaved.push(e);
        }

        let full_prompt = prompt::chat_prompt(&self.build_context(), message);
        let reply = self.generate(config, full_prompt).map(ChatTurn::assistant);

        if let Ok(turn) = &reply {
            if let Err(e) = history.append(turn.clone()) {
                warn!(error = %e, "assistant turn not persisted");
                unsaved.push(e);
            }
        }

        ChatOutcome { reply, unsaved }
    }

    /// Explanations are not part of the chat transcript.
    pub fn explain_error(&self, error_text: &str, config: &ConnectionConfig) -> Result<String, InferenceError> {
        let full_prompt = prompt::explain_prompt(&self.build_context(), error_text);
        self.generate(config, full_prompt)
    }

    fn generate(&self, config: &ConnectionConfig, full_prompt: String) -> Result<String, InferenceError> {
        let url = config.generate_url();
        let request = GenerateRequest {
            model: config.model.clone(),
            prompt: full_prompt,
            stream: false,
        };

        info!(model = %request.model, url = %url, "requesting generation");
        let result = self.transport.generate(&url, &request).and_then(|r| r.into_text());

        if let Err(e) = &result {
            warn!(model = %request.model, error = %e, "generation failed");
        }
        result
    }
}
