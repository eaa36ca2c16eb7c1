pub mod dry_run;
pub mod emailjs;
pub mod payload;
pub mod traits;

pub use dry_run::DryRunSender;
pub use emailjs::EmailJsSender;
pub use traits::EmailSender;

use crate::models::{BookingRequest, PriceQuote};
use anyhow::{Context, Result};
use payload::TemplateParams;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Template ids and the admin inbox
#[derive(Debug, Clone)]
pub struct Templates {
    pub admin_template: String,
    pub user_template: String,
    pub admin_email: String,
}

/// Sends the admin notification for a booking and, when the customer opted
/// in, their confirmation.
///
/// When the customer email fails after the admin email went out, the admin
/// params are remembered so a retry of the same booking does not notify the
/// admin twice.
pub struct BookingNotifier {
    sender: Arc<dyn EmailSender>,
    templates: Templates,
    admin_delivered: Mutex<Option<TemplateParams>>,
}

impl BookingNotifier {
    pub fn new(sender: Arc<dyn EmailSender>, templates: Templates) -> Self {
        Self {
            sender,
            templates,
            admin_delivered: Mutex::new(None),
        }
    }

    pub async fn notify(&self, request: &BookingRequest, quote: &PriceQuote) -> Result<()> {
        info!(
            "Notifying {} about {} request from {} via {}",
            self.templates.admin_email,
            request.service_type.id(),
            request.email,
            self.sender.provider_name()
        );

        let admin = payload::admin_params(request, quote, &self.templates.admin_email);
        let already_sent = self.delivered().as_ref() == Some(&admin);
        if already_sent {
            info!("Admin already has this booking, skipping to the customer email");
        } else {
            self.sender
                .send(&self.templates.admin_template, &admin)
                .await
                .context("Failed to send admin notification")?;
            *self.delivered() = Some(admin);
        }

        if request.send_notifications {
            let user = payload::user_params(request, quote);
            self.sender
                .send(&self.templates.user_template, &user)
                .await
                .context("Failed to send customer confirmation")?;
        } else {
            warn!("Customer opted out of confirmation email");
        }

        *self.delivered() = None;
        Ok(())
    }

    fn delivered(&self) -> MutexGuard<'_, Option<TemplateParams>> {
        self.admin_delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{templates, RecordingSender};
    use super::*;
    use crate::models::ServiceType;

    fn request() -> BookingRequest {
        let mut request = BookingRequest::new(ServiceType::Move);
        request.email = "sam@example.com".into();
        request
    }

    #[tokio::test]
    async fn test_sends_admin_then_user() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = BookingNotifier::new(sender.clone(), templates());

        let request = request();
        notifier.notify(&request, &request.quote()).await.unwrap();

        assert_eq!(sender.templates(), vec!["template_admin", "template_user"]);
    }

    #[tokio::test]
    async fn test_opt_out_skips_user_confirmation() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = BookingNotifier::new(sender.clone(), templates());

        let mut request = request();
        request.send_notifications = false;
        notifier.notify(&request, &request.quote()).await.unwrap();

        assert_eq!(sender.templates(), vec!["template_admin"]);
    }

    #[tokio::test]
    async fn test_failure_is_reported_with_context() {
        let sender = Arc::new(RecordingSender::failing());
        let notifier = BookingNotifier::new(sender.clone(), templates());

        let request = request();
        let err = notifier.notify(&request, &request.quote()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to send admin notification"));
        assert!(sender.templates().is_empty());
    }

    #[tokio::test]
    async fn test_retry_after_customer_failure_skips_admin() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = BookingNotifier::new(sender.clone(), templates());
        let request = request();

        sender.fail_on(Some("template_user"));
        let err = notifier.notify(&request, &request.quote()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to send customer confirmation"));
        assert_eq!(sender.templates(), vec!["template_admin"]);

        sender.fail_on(None);
        notifier.notify(&request, &request.quote()).await.unwrap();
        assert_eq!(sender.templates(), vec!["template_admin", "template_user"]);

        // A later submission is a new booking and reaches the admin again
        notifier.notify(&request, &request.quote()).await.unwrap();
        assert_eq!(
            sender.templates(),
            vec!["template_admin", "template_user", "template_admin", "template_user"]
        );
    }

    #[tokio::test]
    async fn test_edited_booking_is_resent_to_admin() {
        let sender = Arc::new(RecordingSender::default());
        let notifier = BookingNotifier::new(sender.clone(), templates());
        let mut request = request();

        sender.fail_on(Some("template_user"));
        assert!(notifier.notify(&request, &request.quote()).await.is_err());

        sender.fail_on(None);
        request.phone = "512-555-0199".into();
        notifier.notify(&request, &request.quote()).await.unwrap();
        assert_eq!(
            sender.templates(),
            vec!["template_admin", "template_admin", "template_user"]
        );
    }
}
