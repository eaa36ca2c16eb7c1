use crate::analytics::traits::AnalyticsSink;
use crate::analytics::types::AnalyticsEvent;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const MEASUREMENT_PROTOCOL_URL: &str = "https://www.google-analytics.com/mp/collect";

/// GA4 Measurement Protocol sink.
///
/// Each event is posted on its own task. The tasks are kept until
/// [`AnalyticsSink::flush`] so a short-lived process can wait for them.
pub struct Ga4Sink {
    client: Client,
    endpoint: String,
    measurement_id: String,
    api_secret: String,
    client_id: String,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl Ga4Sink {
    pub fn new(
        measurement_id: impl Into<String>,
        api_secret: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: MEASUREMENT_PROTOCOL_URL.to_string(),
            measurement_id: measurement_id.into(),
            api_secret: api_secret.into(),
            client_id: client_id.into(),
            pending: Mutex::new(Vec::new()),
        })
    }

    /// Post somewhere other than the public collect endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Number of posts not yet collected by a flush
    pub fn pending(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn body(&self, event: &AnalyticsEvent) -> Value {
        json!({
            "client_id": self.client_id,
            "events": [{
                "name": event.name(),
                "params": event.params(),
            }],
        })
    }
}

async fn post_event(client: Client, url: String, body: Value) -> Result<()> {
    let response = client
        .post(&url)
        .json(&body)
        .send()
        .await
        .context("Failed to reach GA4")?;

    if !response.status().is_success() {
        bail!("GA4 returned status: {}", response.status());
    }
    Ok(())
}

#[async_trait]
impl AnalyticsSink for Ga4Sink {
    fn track(&self, event: AnalyticsEvent) {
        let Ok(handle) = Handle::try_current() else {
            warn!("No async runtime, dropping {} event", event.name());
            return;
        };

        let url = format!(
            "{}?measurement_id={}&api_secret={}",
            self.endpoint, self.measurement_id, self.api_secret
        );
        let body = self.body(&event);
        let client = self.client.clone();
        let name = event.name();

        let task = handle.spawn(async move {
            match post_event(client, url, body).await {
                Ok(()) => debug!("GA4 event {} delivered", name),
                Err(e) => warn!("GA4 event {} failed: {:#}", name, e),
            }
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|task| !task.is_finished());
        pending.push(task);
    }

    async fn flush(&self) {
        let tasks = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *pending)
        };
        if tasks.is_empty() {
            return;
        }

        debug!("Waiting for {} GA4 event(s)", tasks.len());
        for task in tasks {
            if let Err(e) = task.await {
                warn!("GA4 task ended abnormally: {}", e);
            }
        }
    }
}
