use anyhow::{Context, Result};
use chrono::{Local, Utc};
use spotless_booking::address::{PlacesSuggester, SuggestionDebouncer};
use spotless_booking::analytics::{AnalyticsSink, Ga4Sink, TracingSink};
use spotless_booking::config::AppConfig;
use spotless_booking::models::{BookingRequest, ConfirmedBooking};
use spotless_booking::notify::{BookingNotifier, DryRunSender, EmailJsSender, EmailSender};
use spotless_booking::wizard::Wizard;
use spotless_booking::{pricing, replay, schedule};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: spotless-booking <request.json>
  preferredDates must be weekdays from today on; past dates are skipped";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🧽 Spotless Homes - Booking");
    info!("===========================");

    let path = std::env::args().nth(1).context(USAGE)?;
    let config = AppConfig::from_env()?;

    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path))?;
    let draft: BookingRequest =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path))?;

    let sender: Arc<dyn EmailSender> = match &config.emailjs {
        Some(emailjs) => Arc::new(EmailJsSender::new(&emailjs.service_id, &emailjs.user_id)?),
        None => {
            warn!("EmailJS is not configured, emails will only be logged");
            Arc::new(DryRunSender)
        }
    };
    let analytics: Arc<dyn AnalyticsSink> = match &config.analytics {
        Some(ga) => {
            let client_id = format!("{}.{}", std::process::id(), Utc::now().timestamp());
            Arc::new(Ga4Sink::new(&ga.measurement_id, &ga.api_secret, client_id)?)
        }
        None => Arc::new(TracingSink),
    };

    if let Some(key) = &config.places_api_key {
        let places = Arc::new(PlacesSuggester::new(key, &config.places_country)?);
        let debouncer = SuggestionDebouncer::new(places, config.suggest_debounce);
        if let Some(suggestions) = debouncer.on_input(&draft.street_address).await {
            for suggestion in suggestions.iter().take(5) {
                info!("   address match: {}", suggestion.full_address);
            }
        }
    }

    let notifier = BookingNotifier::new(sender, config.templates());
    let mut wizard = Wizard::new(notifier, analytics.clone(), config.retreat_policy);
    wizard.select_service(draft.service_type)?;

    let today = Local::now().date_naive();
    let outcome = replay::replay(&mut wizard, &draft, today).await;
    analytics.flush().await;
    let confirmed = outcome?;
    print_summary(&confirmed);

    let json = serde_json::to_string_pretty(&confirmed)?;
    tokio::fs::write("booking_confirmation.json", json).await?;
    info!("💾 Saved confirmation to booking_confirmation.json");

    Ok(())
}

fn print_summary(confirmed: &ConfirmedBooking) {
    let request = &confirmed.request;
    let quote = &confirmed.quote;

    println!();
    println!("✅ {}", confirmed.headline());
    println!("   {}", request.service_type.label());
    println!(
        "   {} bed / {} bath, {} sqft",
        request.bedrooms.unwrap_or_default(),
        request.bathrooms.unwrap_or_default(),
        quote.square_feet_label()
    );
    let extras: Vec<&str> = request
        .extras
        .iter()
        .filter_map(|id| pricing::find_extra(id))
        .map(|extra| extra.label)
        .collect();
    if !extras.is_empty() {
        println!("   Extras: {}", extras.join(", "));
    }
    if let Some(plan) = request.recurring_plan {
        println!("   Plan: {}", plan.label());
    }
    if !request.is_estimate_only {
        println!("   Requested schedule:");
        for line in schedule::format_schedule(request).lines() {
            println!("     {}", line);
        }
    }
    println!("   {}, {}", request.name, request.street_address);
    println!("   Subtotal: ${}", quote.subtotal);
    if quote.discount > 0 {
        println!("   Discount: -${}", quote.discount);
    }
    println!("   Total:    ${}", quote.total);
    println!();
}
