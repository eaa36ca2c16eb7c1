use crate::analytics::types::AnalyticsEvent;
use async_trait::async_trait;

/// Fire-and-forget event sink.
/// `track` must return immediately; delivery problems are the sink's to log.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent);

    /// Wait until every event tracked so far has been delivered or given up on
    async fn flush(&self) {}
}
