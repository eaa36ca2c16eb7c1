use crate::notify::payload::TemplateParams;
use crate::notify::traits::EmailSender;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// EmailJS REST sender
pub struct EmailJsSender {
    client: Client,
    service_id: String,
    user_id: String,
    endpoint: String,
}

/// Body of `POST /api/v1.0/email/send`
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

impl EmailJsSender {
    /// Create a sender for an EmailJS service using its public key
    pub fn new(service_id: impl Into<String>, user_id: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            service_id: service_id.into(),
            user_id: user_id.into(),
            endpoint: EMAILJS_SEND_URL.to_string(),
        })
    }

    fn request_body<'a>(&'a self, template_id: &'a str, params: &'a TemplateParams) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.service_id,
            template_id,
            user_id: &self.user_id,
            template_params: params,
        }
    }
}

#[async_trait]
impl EmailSender for EmailJsSender {
    async fn send(&self, template_id: &str, params: &TemplateParams) -> Result<()> {
        debug!("Sending template {} via EmailJS ({} params)", template_id, params.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(template_id, params))
            .send()
            .await
            .context("Failed to reach EmailJS")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("EmailJS returned status {}: {}", status, body.trim());
        }

        info!("EmailJS accepted template {}", template_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "EmailJS"
    }
}
