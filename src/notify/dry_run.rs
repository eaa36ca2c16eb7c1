use crate::notify::payload::TemplateParams;
use crate::notify::traits::EmailSender;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Logs messages instead of delivering them. Used when no email backend is configured.
pub struct DryRunSender;

#[async_trait]
impl EmailSender for DryRunSender {
    async fn send(&self, template_id: &str, params: &TemplateParams) -> Result<()> {
        info!("[dry run] template {}", template_id);
        for (key, value) in params {
            info!("[dry run]   {} = {}", key, value);
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "dry-run"
    }
}
