use crate::address::traits::AddressSuggester;
use crate::address::types::AddressSuggestion;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const AUTOCOMPLETE_URL: &str = "https://maps.googleapis.com/maps/api/place/autocomplete/json";

/// Google Places Autocomplete, restricted to street addresses in one country
pub struct PlacesSuggester {
    client: Client,
    api_key: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    description: String,
    place_id: Option<String>,
    structured_formatting: Option<StructuredFormatting>,
}

#[derive(Debug, Deserialize)]
struct StructuredFormatting {
    main_text: String,
}

impl PlacesSuggester {
    pub fn new(api_key: impl Into<String>, country: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            country: country.into(),
        })
    }
}

fn into_suggestions(response: AutocompleteResponse) -> Result<Vec<AddressSuggestion>> {
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => {}
        other => bail!(
            "Places autocomplete returned {}: {}",
            other,
            response.error_message.unwrap_or_default()
        ),
    }

    Ok(response
        .predictions
        .into_iter()
        .map(|p| AddressSuggestion {
            label: p
                .structured_formatting
                .map(|f| f.main_text)
                .unwrap_or_else(|| p.description.clone()),
            full_address: p.description,
            place_id: p.place_id,
        })
        .collect())
}

#[async_trait]
impl AddressSuggester for PlacesSuggester {
    async fn suggest(&self, query: &str) -> Result<Vec<AddressSuggestion>> {
        debug!("Places autocomplete for {:?}", query);

        let components = format!("country:{}", self.country);
        let response = self
            .client
            .get(AUTOCOMPLETE_URL)
            .query(&[
                ("input", query),
                ("types", "address"),
                ("components", components.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach Places API")?;

        if !response.status().is_success() {
            warn!("Places API returned status: {}", response.status());
            bail!("Places API returned status: {}", response.status());
        }

        let body: AutocompleteResponse = response
            .json()
            .await
            .context("Failed to decode Places response")?;
        into_suggestions(body)
    }

    fn source_name(&self) -> &'static str {
        "Google Places"
    }
}
