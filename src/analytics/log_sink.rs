use crate::analytics::traits::AnalyticsSink;
use crate::analytics::types::AnalyticsEvent;
use async_trait::async_trait;
use tracing::info;

/// Writes events to the log. Used when no measurement id is configured.
pub struct TracingSink;

#[async_trait]
impl AnalyticsSink for TracingSink {
    fn track(&self, event: AnalyticsEvent) {
        info!(event = event.name(), params = %event.params(), "analytics");
    }
}
