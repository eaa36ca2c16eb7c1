use crate::notify::Templates;
use crate::wizard::RetreatPolicy;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Duration;

/// EmailJS account details
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub user_id: String,
    pub templates: Templates,
}

/// GA4 Measurement Protocol credentials
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub measurement_id: String,
    pub api_secret: String,
}

/// Runtime settings, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// No EmailJS settings means emails are only logged
    pub emailjs: Option<EmailJsConfig>,
    pub places_api_key: Option<String>,
    /// Country restriction for address suggestions
    pub places_country: String,
    pub suggest_debounce: Duration,
    pub analytics: Option<AnalyticsConfig>,
    pub retreat_policy: RetreatPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            emailjs: None,
            places_api_key: None,
            places_country: "us".to_string(),
            suggest_debounce: Duration::from_millis(300),
            analytics: None,
            retreat_policy: RetreatPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key).with_context(|| format!("{} must be set when EMAILJS_SERVICE_ID is", key))
        };

        let mut config = AppConfig::default();

        if let Some(service_id) = get("EMAILJS_SERVICE_ID") {
            config.emailjs = Some(EmailJsConfig {
                service_id,
                user_id: require("EMAILJS_USER_ID")?,
                templates: Templates {
                    admin_template: require("EMAILJS_ADMIN_TEMPLATE_ID")?,
                    user_template: require("EMAILJS_USER_TEMPLATE_ID")?,
                    admin_email: require("ADMIN_EMAIL")?,
                },
            });
        }

        config.places_api_key = get("PLACES_API_KEY");
        if let Some(country) = get("PLACES_COUNTRY") {
            config.places_country = country.to_ascii_lowercase();
        }

        if let Some(ms) = get("SUGGEST_DEBOUNCE_MS") {
            let ms: u64 = ms
                .parse()
                .with_context(|| format!("SUGGEST_DEBOUNCE_MS is not a number: {}", ms))?;
            config.suggest_debounce = Duration::from_millis(ms);
        }

        if let (Some(measurement_id), Some(api_secret)) =
            (get("GA_MEASUREMENT_ID"), get("GA_API_SECRET"))
        {
            config.analytics = Some(AnalyticsConfig {
                measurement_id,
                api_secret,
            });
        }

        if let Some(policy) = get("RETREAT_POLICY") {
            config.retreat_policy = policy.parse().context("Invalid RETREAT_POLICY")?;
        }

        Ok(config)
    }

    /// Template ids to use when emails only go to the log
    pub fn templates(&self) -> Templates {
        match &self.emailjs {
            Some(emailjs) => emailjs.templates.clone(),
            None => Templates {
                admin_template: "admin".to_string(),
                user_template: "user".to_string(),
                admin_email: "admin@localhost".to_string(),
            },
        }
    }
}
