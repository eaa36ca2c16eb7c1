use crate::models::ServiceType;
use crate::wizard::Step;
use serde_json::{json, Value};

/// Funnel events emitted by the wizard
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    ServiceSelected { service: ServiceType },
    StepViewed { step: Step },
    /// A booking or estimate request went through
    Lead { value: u32, estimate_only: bool },
}

impl AnalyticsEvent {
    /// GA4 event name
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::ServiceSelected { .. } => "select_service",
            AnalyticsEvent::StepViewed { .. } => "step_view",
            AnalyticsEvent::Lead { .. } => "generate_lead",
        }
    }

    pub fn params(&self) -> Value {
        match self {
            AnalyticsEvent::ServiceSelected { service } => json!({
                "service_type": service.id(),
            }),
            AnalyticsEvent::StepViewed { step } => json!({
                "step_name": step.title(),
                "step_index": step.index(),
            }),
            AnalyticsEvent::Lead {
                value,
                estimate_only,
            } => json!({
                "value": value,
                "currency": "USD",
                "estimate_only": estimate_only,
            }),
        }
    }
}
