use crate::models::{BookingRequest, PriceQuote};
use crate::schedule;
use std::collections::BTreeMap;

/// Flat key/value record handed to an email template
pub type TemplateParams = BTreeMap<String, String>;

/// Everything the admin needs to follow up on a request
pub fn booking_params(request: &BookingRequest, quote: &PriceQuote) -> TemplateParams {
    let mut params = TemplateParams::new();
    let mut put = |key: &str, value: String| {
        params.insert(key.to_string(), value);
    };

    put("name", request.name.clone());
    put("phone", request.phone.clone());
    put("email", request.email.clone());
    put("streetAddress", request.street_address.clone());
    put("unitNumber", request.unit_number.clone());
    put("serviceType", request.service_type.label().to_string());
    put("bedrooms", optional_count(request.bedrooms));
    put("bathrooms", optional_count(request.bathrooms));
    put("squareFeet", quote.square_feet_label());
    put(
        "extras",
        request.extras.iter().cloned().collect::<Vec<_>>().join(", "),
    );
    put(
        "propertyCondition",
        request
            .property_condition
            .map(|c| c.label().to_string())
            .unwrap_or_default(),
    );
    put("hasPets", yes_no(request.has_pets));
    put("accessMethod", access_text(request));
    put("specialNotes", request.special_notes.clone());
    put(
        "recurringPlan",
        request
            .recurring_plan
            .map(|p| p.label())
            .unwrap_or("One Time")
            .to_string(),
    );
    put("subtotal", quote.subtotal.to_string());
    put("discount", quote.discount.to_string());
    put("totalPrice", quote.total.to_string());
    put("isEstimateOnly", yes_no(request.is_estimate_only));
    if !request.is_estimate_only {
        put("preferredTimes", schedule::format_schedule(request));
    }

    params
}

pub fn admin_params(
    request: &BookingRequest,
    quote: &PriceQuote,
    admin_email: &str,
) -> TemplateParams {
    let mut params = booking_params(request, quote);
    params.insert("admin_email".to_string(), admin_email.to_string());
    params
}

/// Confirmation sent to the customer
pub fn user_params(request: &BookingRequest, quote: &PriceQuote) -> TemplateParams {
    let mut params = TemplateParams::new();
    params.insert("user_email".to_string(), request.email.clone());
    params.insert("name".to_string(), request.name.clone());
    params.insert(
        "serviceType".to_string(),
        request.service_type.label().to_string(),
    );
    params.insert("totalPrice".to_string(), quote.total.to_string());
    params.insert("isEstimateOnly".to_string(), yes_no(request.is_estimate_only));
    if !request.is_estimate_only {
        params.insert(
            "preferredTimes".to_string(),
            schedule::format_schedule(request),
        );
    }
    params
}

fn optional_count(value: Option<u8>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn yes_no(flag: bool) -> String {
    let answer = if flag { "Yes" } else { "No" };
    answer.to_string()
}

fn access_text(request: &BookingRequest) -> String {
    match (request.access_method, request.access_code.as_deref()) {
        (Some(method), Some(code)) => format!("{}: {}", method.label(), code),
        (Some(method), None) => method.label().to_string(),
        (None, _) => String::new(),
    }
}
