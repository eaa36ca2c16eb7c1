use crate::notify::payload::TemplateParams;
use anyhow::Result;
use async_trait::async_trait;

/// Transactional email backend.
/// Implementations deliver one templated message per call.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Render `template_id` with `params` and send it
    async fn send(&self, template_id: &str, params: &TemplateParams) -> Result<()>;

    /// Name of the delivery backend, for logs
    fn provider_name(&self) -> &'static str;
}
