pub mod gemini;

use async_trait::async_trait;
use shared::error::RequestError;
use shared::settings::ModelTier;

/// Seam over the completion endpoint so the conversation layer can be
/// exercised without a network.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue one completion request for a user turn.
    ///
    /// Single shot: no retries, no streaming. Retry policy, if any, belongs
    /// to the caller.
    async fn send(
        &self,
        key: &str,
        user_text: &str,
        page_context: &str,
        tier: ModelTier,
    ) -> Result<String, RequestError>;
}
