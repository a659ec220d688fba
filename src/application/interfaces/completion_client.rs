use async_trait::async_trait;

use crate::domain::{CompletionRequest, DomainError};

/// An interface for executing chat completions against the USDCode endpoint.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details.  Consumers (e.g. [`crate::application::AskUsdcodeUseCase`]) remain
/// decoupled from any particular provider or HTTP client library.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Execute a non-streaming completion and return the first choice's
    /// message content, or `None` when the upstream yields no content.
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, DomainError>;

    /// Execute a streaming completion and return the concatenation, in
    /// delivery order, of every non-empty delta fragment.  The result may be
    /// empty when the upstream sends no textual deltas.
    async fn complete_stream(&self, request: &CompletionRequest) -> Result<String, DomainError>;
}
