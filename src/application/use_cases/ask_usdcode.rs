use std::sync::Arc;

use tracing::{debug, info};

use crate::application::CompletionClient;
use crate::domain::{CompletionRequest, DomainError};

/// Placeholder returned when a non-streaming completion carries no content.
const EMPTY_CONTENT_FALLBACK: &str = "No content returned by USDCode.";
/// Placeholder returned when a streamed completion yields no deltas.
const EMPTY_STREAM_FALLBACK: &str = "No streamed content returned by USDCode.";

/// Forwards a question to the USDCode endpoint and normalizes the answer
/// into a single non-empty text string.
///
/// Transport and upstream failures propagate unchanged; only the
/// empty-content condition is absorbed locally, by substituting a fixed
/// placeholder so callers always receive text.
pub struct AskUsdcodeUseCase {
    client: Arc<dyn CompletionClient>,
}

impl AskUsdcodeUseCase {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, request: CompletionRequest) -> Result<String, DomainError> {
        info!(
            "Asking USDCode (expert_type={}, stream={})",
            request.expert_type(),
            request.stream()
        );

        let text = if request.stream() {
            let accumulated = self.client.complete_stream(&request).await?;
            if accumulated.is_empty() {
                EMPTY_STREAM_FALLBACK.to_string()
            } else {
                accumulated
            }
        } else {
            match self.client.complete(&request).await? {
                Some(content) => content,
                None => EMPTY_CONTENT_FALLBACK.to_string(),
            }
        };

        debug!("USDCode returned {} bytes", text.len());
        Ok(text)
    }
}
