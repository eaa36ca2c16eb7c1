use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::models::{BookingRequest, ConfirmedBooking, PriceQuote, ServiceType};
use crate::notify::BookingNotifier;
use crate::wizard::steps::{Field, Step};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// What backing out of the first step does to the draft
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetreatPolicy {
    /// Keep the draft; picking a service again resumes it under the new service
    #[default]
    Preserve,
    /// Throw the draft away
    Clear,
}

impl FromStr for RetreatPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(RetreatPolicy::Preserve),
            "clear" => Ok(RetreatPolicy::Clear),
            other => anyhow::bail!("unknown retreat policy {:?}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Phase {
    ServiceSelection,
    Step(Step),
    Submitting,
    Confirmation(ConfirmedBooking),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::ServiceSelection => "selecting a service",
            Phase::Step(_) => "entering details",
            Phase::Submitting => "submitting",
            Phase::Confirmation(_) => "showing the confirmation",
        }
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{step} is incomplete: missing {}", join_fields(.fields))]
    Invalid { step: Step, fields: Vec<Field> },

    #[error("cannot {action} while {phase}")]
    NotAvailable {
        action: &'static str,
        phase: &'static str,
    },

    #[error("submission failed: {0:#}")]
    Submission(anyhow::Error),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of a successful [`Wizard::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advanced {
    Moved(Step),
    Submitted,
}

/// Drives one booking flow from service selection to confirmation.
///
/// Owns the draft exclusively; every edit goes through [`Wizard::update`].
pub struct Wizard {
    phase: Phase,
    request: BookingRequest,
    field_errors: Vec<Field>,
    submission_error: Option<String>,
    retreat_policy: RetreatPolicy,
    notifier: BookingNotifier,
    analytics: Arc<dyn AnalyticsSink>,
}

impl Wizard {
    pub fn new(
        notifier: BookingNotifier,
        analytics: Arc<dyn AnalyticsSink>,
        retreat_policy: RetreatPolicy,
    ) -> Self {
        Self {
            phase: Phase::ServiceSelection,
            request: BookingRequest::default(),
            field_errors: Vec::new(),
            submission_error: None,
            retreat_policy,
            notifier,
            analytics,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn current_step(&self) -> Option<Step> {
        match self.phase {
            Phase::Step(step) => Some(step),
            _ => None,
        }
    }

    pub fn request(&self) -> &BookingRequest {
        &self.request
    }

    /// Live price for whatever has been entered so far
    pub fn quote(&self) -> PriceQuote {
        self.request.quote()
    }

    /// Fields that blocked the last advance on the current step
    pub fn field_errors(&self) -> &[Field] {
        &self.field_errors
    }

    /// Message from the last failed submission, cleared on the next attempt
    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    pub fn select_service(&mut self, service: ServiceType) -> Result<(), WizardError> {
        if !matches!(self.phase, Phase::ServiceSelection) {
            return Err(self.not_available("select a service"));
        }

        match self.retreat_policy {
            RetreatPolicy::Preserve => self.request.service_type = service,
            RetreatPolicy::Clear => self.request = BookingRequest::new(service),
        }
        info!("Selected {}", service.label());
        self.analytics.track(AnalyticsEvent::ServiceSelected { service });
        self.enter(Step::first());
        Ok(())
    }

    /// Apply an edit to the draft and return the refreshed quote.
    /// The service type is fixed for the whole flow and cannot be changed here.
    pub fn update<F>(&mut self, edit: F) -> Result<PriceQuote, WizardError>
    where
        F: FnOnce(&mut BookingRequest),
    {
        if self.current_step().is_none() {
            return Err(self.not_available("edit the booking"));
        }

        let service = self.request.service_type;
        edit(&mut self.request);
        if self.request.service_type != service {
            warn!("Ignoring service change inside a booking flow");
            self.request.service_type = service;
        }

        // Errors clear as soon as the offending field is filled
        let request = &self.request;
        self.field_errors.retain(|field| {
            Step::SEQUENCE
                .iter()
                .any(|step| step.missing_fields(request).contains(field))
        });

        Ok(self.request.quote())
    }

    /// Validate the current step and move on, submitting from the last one
    pub async fn advance(&mut self) -> Result<Advanced, WizardError> {
        let Some(step) = self.current_step() else {
            return Err(self.not_available("continue"));
        };

        let missing = step.missing_fields(&self.request);
        if !missing.is_empty() {
            debug!("{} blocked on {}", step, join_fields(&missing));
            self.field_errors = missing.clone();
            return Err(WizardError::Invalid {
                step,
                fields: missing,
            });
        }
        self.field_errors.clear();

        match step.next() {
            Some(next) => {
                self.enter(next);
                Ok(Advanced::Moved(next))
            }
            None => self.submit().await.map(|()| Advanced::Submitted),
        }
    }

    /// Go back one step; from the first step, back to service selection
    pub fn retreat(&mut self) -> Result<(), WizardError> {
        let Some(step) = self.current_step() else {
            return Err(self.not_available("go back"));
        };

        self.field_errors.clear();
        match step.prev() {
            Some(prev) => self.enter(prev),
            None => {
                if self.retreat_policy == RetreatPolicy::Clear {
                    self.request = BookingRequest::default();
                }
                debug!("Back to service selection ({:?})", self.retreat_policy);
                self.phase = Phase::ServiceSelection;
            }
        }
        Ok(())
    }

    /// Mark the in-flight submission as delivered
    pub fn submit_succeeded(&mut self) -> Result<(), WizardError> {
        if !matches!(self.phase, Phase::Submitting) {
            return Err(self.not_available("confirm a submission"));
        }

        let request = std::mem::take(&mut self.request);
        let quote = request.quote();
        let confirmed = ConfirmedBooking {
            request,
            quote,
            submitted_at: Utc::now(),
        };

        info!("{} Total ${}", confirmed.headline(), quote.total);
        self.analytics.track(AnalyticsEvent::Lead {
            value: quote.total,
            estimate_only: confirmed.request.is_estimate_only,
        });
        self.submission_error = None;
        self.phase = Phase::Confirmation(confirmed);
        Ok(())
    }

    /// Reopen a confirmed booking on the last step
    pub fn edit_from_confirmation(&mut self) -> Result<(), WizardError> {
        let Phase::Confirmation(confirmed) = &self.phase else {
            return Err(self.not_available("edit a confirmed booking"));
        };

        self.request = confirmed.request.clone();
        self.enter(Step::last());
        Ok(())
    }

    /// Drop everything and start over
    pub fn cancel(&mut self) {
        debug!("Cancelled while {}", self.phase.name());
        self.request = BookingRequest::default();
        self.field_errors.clear();
        self.submission_error = None;
        self.phase = Phase::ServiceSelection;
    }

    async fn submit(&mut self) -> Result<(), WizardError> {
        self.phase = Phase::Submitting;
        self.submission_error = None;

        let quote = self.request.quote();
        info!(
            "Submitting {} for {} (total ${})",
            if self.request.is_estimate_only { "estimate request" } else { "booking" },
            self.request.email,
            quote.total
        );

        let delivered = self.notifier.notify(&self.request, &quote).await;
        match delivered {
            Ok(()) => self.submit_succeeded(),
            Err(e) => {
                error!("Failed to submit booking: {:#}", e);
                self.submission_error = Some(format!("{:#}", e));
                self.phase = Phase::Step(Step::last());
                Err(WizardError::Submission(e))
            }
        }
    }

    fn enter(&mut self, step: Step) {
        debug!("Entering step {} ({})", step.index() + 1, step);
        self.phase = Phase::Step(step);
        self.analytics.track(AnalyticsEvent::StepViewed { step });
    }

    fn not_available(&self, action: &'static str) -> WizardError {
        WizardError::NotAvailable {
            action,
            phase: self.phase.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::RecordingSink;
    use crate::models::PropertyCondition;
    use crate::notify::testing::{templates, RecordingSender};
    use crate::schedule;
    use chrono::NaiveDate;

    struct Harness {
        wizard: Wizard,
        sender: Arc<RecordingSender>,
        sink: Arc<RecordingSink>,
    }

    fn harness(policy: RetreatPolicy) -> Harness {
        let sender = Arc::new(RecordingSender::default());
        let sink = Arc::new(RecordingSink::default());
        let notifier = BookingNotifier::new(sender.clone(), templates());
        Harness {
            wizard: Wizard::new(notifier, sink.clone(), policy),
            sender,
            sink,
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn fill_step(wizard: &mut Wizard) {
        let step = wizard.current_step().unwrap();
        wizard
            .update(|r| match step {
                Step::Rooms => {
                    r.set_bedrooms(2).unwrap();
                    r.set_bathrooms(1).unwrap();
                }
                Step::Condition => r.property_condition = Some(PropertyCondition::Fair),
                Step::Extras => {
                    r.toggle_extra("window");
                }
                Step::Schedule => {
                    let tue = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
                    schedule::toggle_slot(r, tue, "9 AM - 10 AM", monday()).unwrap();
                }
                Step::AddressContact => {
                    r.street_address = "12 Elm St, Austin, TX, USA".into();
                    r.name = "Sam Rivera".into();
                    r.phone = "512-555-0100".into();
                    r.email = "sam@example.com".into();
                }
            })
            .unwrap();
    }

    async fn walk_to(wizard: &mut Wizard, target: Step) {
        while wizard.current_step() != Some(target) {
            fill_step(wizard);
            wizard.advance().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_select_service_enters_first_step() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Deep).unwrap();

        assert_eq!(h.wizard.current_step(), Some(Step::Rooms));
        assert_eq!(h.wizard.request().service_type, ServiceType::Deep);
        assert_eq!(h.sink.names(), vec!["select_service", "step_view"]);
        assert!(h.wizard.select_service(ServiceType::Move).is_err());
    }

    #[tokio::test]
    async fn test_advance_blocked_until_step_valid() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();

        let err = h.wizard.advance().await.unwrap_err();
        match err {
            WizardError::Invalid { step, fields } => {
                assert_eq!(step, Step::Rooms);
                assert_eq!(fields, vec![Field::Bedrooms, Field::Bathrooms]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(h.wizard.current_step(), Some(Step::Rooms));
        assert_eq!(h.wizard.field_errors(), &[Field::Bedrooms, Field::Bathrooms]);

        h.wizard.update(|r| r.bedrooms = Some(3)).unwrap();
        assert_eq!(h.wizard.field_errors(), &[Field::Bathrooms]);

        h.wizard.update(|r| r.bathrooms = Some(2)).unwrap();
        assert!(h.wizard.field_errors().is_empty());
        assert_eq!(h.wizard.advance().await.unwrap(), Advanced::Moved(Step::Condition));
    }

    #[tokio::test]
    async fn test_every_valid_step_advances_once() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();

        for expected in &Step::SEQUENCE[1..] {
            fill_step(&mut h.wizard);
            assert_eq!(h.wizard.advance().await.unwrap(), Advanced::Moved(*expected));
        }
        assert_eq!(h.wizard.current_step(), Some(Step::last()));
        assert!(h.sender.templates().is_empty());
    }

    #[tokio::test]
    async fn test_update_returns_live_quote_and_pins_service() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();

        let quote = h
            .wizard
            .update(|r| {
                r.bedrooms = Some(2);
                r.bathrooms = Some(1);
                r.service_type = ServiceType::Deep;
            })
            .unwrap();
        assert_eq!(quote.total, 139);
        assert_eq!(h.wizard.request().service_type, ServiceType::Regular);
    }

    #[tokio::test]
    async fn test_submission_confirms_and_resets() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();
        walk_to(&mut h.wizard, Step::last()).await;
        fill_step(&mut h.wizard);

        assert_eq!(h.wizard.advance().await.unwrap(), Advanced::Submitted);

        let Phase::Confirmation(confirmed) = h.wizard.phase() else {
            panic!("expected confirmation, got {}", h.wizard.phase().name());
        };
        assert_eq!(confirmed.quote.total, 259);
        assert_eq!(confirmed.request.name, "Sam Rivera");
        assert_eq!(confirmed.headline(), "Booking Request Submitted!");
        assert_eq!(h.wizard.request(), &BookingRequest::default());
        assert_eq!(h.sender.templates(), vec!["template_admin", "template_user"]);
        assert_eq!(h.sink.names().last(), Some(&"generate_lead"));
    }

    #[tokio::test]
    async fn test_scenario_d_estimate_only_submission() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();
        walk_to(&mut h.wizard, Step::Schedule).await;

        h.wizard.update(|r| r.is_estimate_only = true).unwrap();
        assert_eq!(
            h.wizard.advance().await.unwrap(),
            Advanced::Moved(Step::AddressContact)
        );
        fill_step(&mut h.wizard);
        h.wizard.advance().await.unwrap();

        let sent = h.sender.sent.lock().unwrap();
        let (_, admin) = &sent[0];
        assert_eq!(admin["isEstimateOnly"], "Yes");
        assert!(!admin.contains_key("preferredTimes"));
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_data_and_allows_retry() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();
        walk_to(&mut h.wizard, Step::last()).await;
        fill_step(&mut h.wizard);

        h.sender.set_failing(true);
        let err = h.wizard.advance().await.unwrap_err();
        assert!(matches!(err, WizardError::Submission(_)));
        assert_eq!(h.wizard.current_step(), Some(Step::last()));
        assert_eq!(h.wizard.request().name, "Sam Rivera");
        assert!(h
            .wizard
            .submission_error()
            .unwrap()
            .contains("mail backend unavailable"));

        h.sender.set_failing(false);
        assert_eq!(h.wizard.advance().await.unwrap(), Advanced::Submitted);
        assert!(h.wizard.submission_error().is_none());
    }

    #[tokio::test]
    async fn test_retry_after_customer_email_failure_notifies_admin_once() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();
        walk_to(&mut h.wizard, Step::last()).await;
        fill_step(&mut h.wizard);

        h.sender.fail_on(Some("template_user"));
        assert!(h.wizard.advance().await.is_err());
        assert_eq!(h.wizard.current_step(), Some(Step::last()));

        h.sender.fail_on(None);
        assert_eq!(h.wizard.advance().await.unwrap(), Advanced::Submitted);
        assert_eq!(h.sender.templates(), vec!["template_admin", "template_user"]);
    }

    #[tokio::test]
    async fn test_retreat_walks_back_to_service_selection() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();
        walk_to(&mut h.wizard, Step::Extras).await;

        h.wizard.retreat().unwrap();
        assert_eq!(h.wizard.current_step(), Some(Step::Condition));
        h.wizard.retreat().unwrap();
        h.wizard.retreat().unwrap();
        assert!(matches!(h.wizard.phase(), Phase::ServiceSelection));
        assert!(h.wizard.retreat().is_err());
    }

    #[tokio::test]
    async fn test_retreat_from_first_step_preserves_draft() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();
        fill_step(&mut h.wizard);
        h.wizard.retreat().unwrap();

        assert!(matches!(h.wizard.phase(), Phase::ServiceSelection));
        assert_eq!(h.wizard.request().bedrooms, Some(2));

        h.wizard.select_service(ServiceType::Airbnb).unwrap();
        assert_eq!(h.wizard.request().service_type, ServiceType::Airbnb);
        assert_eq!(h.wizard.request().bathrooms, Some(1));
        assert_eq!(h.wizard.quote().total, 149);
    }

    #[tokio::test]
    async fn test_retreat_from_first_step_clears_draft() {
        let mut h = harness(RetreatPolicy::Clear);
        h.wizard.select_service(ServiceType::Regular).unwrap();
        fill_step(&mut h.wizard);
        h.wizard.retreat().unwrap();

        assert!(matches!(h.wizard.phase(), Phase::ServiceSelection));
        assert_eq!(h.wizard.request(), &BookingRequest::default());

        h.wizard.select_service(ServiceType::Airbnb).unwrap();
        assert_eq!(h.wizard.request().bedrooms, None);
    }

    #[tokio::test]
    async fn test_edit_from_confirmation_restores_snapshot() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Regular).unwrap();
        walk_to(&mut h.wizard, Step::last()).await;
        fill_step(&mut h.wizard);
        h.wizard.advance().await.unwrap();

        h.wizard.edit_from_confirmation().unwrap();
        assert_eq!(h.wizard.current_step(), Some(Step::last()));
        assert_eq!(h.wizard.request().email, "sam@example.com");
        assert_eq!(h.wizard.quote().total, 259);
        assert!(h.wizard.edit_from_confirmation().is_err());
    }

    #[tokio::test]
    async fn test_cancel_resets_from_any_phase() {
        let mut h = harness(RetreatPolicy::Preserve);
        h.wizard.select_service(ServiceType::Move).unwrap();
        walk_to(&mut h.wizard, Step::Schedule).await;

        h.wizard.cancel();
        assert!(matches!(h.wizard.phase(), Phase::ServiceSelection));
        assert_eq!(h.wizard.request(), &BookingRequest::default());
        assert!(h.wizard.update(|r| r.name = "x".into()).is_err());
    }

    #[test]
    fn test_retreat_policy_parses() {
        assert_eq!("Clear".parse::<RetreatPolicy>().unwrap(), RetreatPolicy::Clear);
        assert_eq!(" preserve ".parse::<RetreatPolicy>().unwrap(), RetreatPolicy::Preserve);
        assert!("forget".parse::<RetreatPolicy>().is_err());
    }

    #[test]
    fn test_invalid_error_lists_fields() {
        let err = WizardError::Invalid {
            step: Step::AddressContact,
            fields: vec![Field::Name, Field::Email],
        };
        assert_eq!(
            err.to_string(),
            "Address & Contact is incomplete: missing name, email"
        );
    }
}
