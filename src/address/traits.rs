use crate::address::types::AddressSuggestion;
use anyhow::Result;
use async_trait::async_trait;

/// Address autocomplete backend
#[async_trait]
pub trait AddressSuggester: Send + Sync {
    /// Candidate addresses for a partial query, best match first
    async fn suggest(&self, query: &str) -> Result<Vec<AddressSuggestion>>;

    /// Name of the backend, for logs
    fn source_name(&self) -> &'static str;
}
