use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// ChatAgent Trait
// =============================================================================

/// A provider that can answer a single-turn system + user exchange.
#[async_trait]
pub trait ChatAgent: Send + Sync {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send one system + user exchange and return the reply text.
    ///
    /// An empty reply is an error, never `Ok("")`.
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String>;
}
