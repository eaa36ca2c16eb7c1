pub mod ga4;
pub mod log_sink;
pub mod traits;
pub mod types;

pub use ga4::Ga4Sink;
pub use log_sink::TracingSink;
pub use traits::AnalyticsSink;
pub use types::AnalyticsEvent;
