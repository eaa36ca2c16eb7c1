use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Selectable bedroom counts
pub const BEDROOM_RANGE: std::ops::RangeInclusive<u8> = 1..=6;
/// Selectable bathroom counts (a half bath counts as a full one)
pub const BATHROOM_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Kind of cleaning the customer is booking
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    #[default]
    Regular,
    Deep,
    Move,
    Airbnb,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Regular,
        ServiceType::Deep,
        ServiceType::Move,
        ServiceType::Airbnb,
    ];

    /// Identifier used in payloads and analytics
    pub fn id(&self) -> &'static str {
        match self {
            ServiceType::Regular => "regular",
            ServiceType::Deep => "deep",
            ServiceType::Move => "move",
            ServiceType::Airbnb => "airbnb",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Regular => "Regular Cleaning",
            ServiceType::Deep => "Deep Cleaning",
            ServiceType::Move => "Move In/Out Cleaning",
            ServiceType::Airbnb => "Airbnb Cleaning",
        }
    }
}

/// Self-reported state of the property
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyCondition {
    WellMaintained,
    Fair,
    NeedsAttention,
}

impl PropertyCondition {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyCondition::WellMaintained => "Well maintained",
            PropertyCondition::Fair => "Fair",
            PropertyCondition::NeedsAttention => "Need attention",
        }
    }
}

/// How the cleaners get into the property
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMethod {
    SomeoneHome,
    AccessCode,
    HiddenKey,
    Other,
}

impl AccessMethod {
    pub fn label(&self) -> &'static str {
        match self {
            AccessMethod::SomeoneHome => "Someone is Home",
            AccessMethod::AccessCode => "Access Code",
            AccessMethod::HiddenKey => "Hidden Key",
            AccessMethod::Other => "Other",
        }
    }

    /// Whether a free-text code or instruction goes with this method
    pub fn takes_code(&self) -> bool {
        !matches!(self, AccessMethod::SomeoneHome)
    }
}

/// Recurring cleaning plans. A one-time clean is the absence of a plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurringPlan {
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurringPlan {
    pub fn label(&self) -> &'static str {
        match self {
            RecurringPlan::Weekly => "Weekly",
            RecurringPlan::Biweekly => "Every 2 Weeks",
            RecurringPlan::Monthly => "Monthly",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },
}

/// Everything collected over one booking flow.
///
/// Price fields are not stored here; they are always recomputed from the
/// inputs through [`BookingRequest::quote`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    pub service_type: ServiceType,
    pub bedrooms: Option<u8>,
    pub bathrooms: Option<u8>,
    pub extras: BTreeSet<String>,
    pub property_condition: Option<PropertyCondition>,
    pub has_pets: bool,
    pub access_method: Option<AccessMethod>,
    pub access_code: Option<String>,
    pub special_notes: String,
    pub preferred_dates: BTreeSet<NaiveDate>,
    pub preferred_times: BTreeMap<NaiveDate, Vec<String>>,
    pub recurring_plan: Option<RecurringPlan>,
    pub street_address: String,
    pub unit_number: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub send_notifications: bool,
    pub is_estimate_only: bool,
}

impl Default for BookingRequest {
    fn default() -> Self {
        Self {
            service_type: ServiceType::default(),
            bedrooms: None,
            bathrooms: None,
            extras: BTreeSet::new(),
            property_condition: None,
            has_pets: false,
            access_method: None,
            access_code: None,
            special_notes: String::new(),
            preferred_dates: BTreeSet::new(),
            preferred_times: BTreeMap::new(),
            recurring_plan: None,
            street_address: String::new(),
            unit_number: String::new(),
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            send_notifications: true,
            is_estimate_only: false,
        }
    }
}

impl BookingRequest {
    /// Fresh request for the chosen service
    pub fn new(service_type: ServiceType) -> Self {
        Self {
            service_type,
            ..Default::default()
        }
    }

    pub fn set_bedrooms(&mut self, bedrooms: u8) -> Result<(), ModelError> {
        check_range("bedrooms", bedrooms, &BEDROOM_RANGE)?;
        self.bedrooms = Some(bedrooms);
        Ok(())
    }

    pub fn set_bathrooms(&mut self, bathrooms: u8) -> Result<(), ModelError> {
        check_range("bathrooms", bathrooms, &BATHROOM_RANGE)?;
        self.bathrooms = Some(bathrooms);
        Ok(())
    }

    /// Add or remove an extra; returns whether it is now selected
    pub fn toggle_extra(&mut self, id: &str) -> bool {
        if self.extras.remove(id) {
            false
        } else {
            self.extras.insert(id.to_string());
            true
        }
    }

    /// Set the access method, dropping any code the new method cannot carry
    pub fn set_access(&mut self, method: AccessMethod, code: Option<String>) {
        self.access_method = Some(method);
        self.access_code = if method.takes_code() {
            code.filter(|c| !c.trim().is_empty())
        } else {
            None
        };
    }

    /// Dates that carry at least one non-blank time slot, in calendar order
    pub fn scheduled_dates(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<String>)> {
        self.preferred_dates.iter().filter_map(|date| {
            self.preferred_times
                .get(date)
                .filter(|slots| slots.iter().any(|s| !s.trim().is_empty()))
                .map(|slots| (date, slots))
        })
    }

    pub fn has_schedule(&self) -> bool {
        self.scheduled_dates().next().is_some()
    }

    pub fn quote(&self) -> PriceQuote {
        crate::pricing::compute_price(self)
    }
}

fn check_range(
    field: &'static str,
    value: u8,
    range: &std::ops::RangeInclusive<u8>,
) -> Result<(), ModelError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ModelError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Output of the pricing engine, in whole dollars
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub subtotal: u32,
    pub discount: u32,
    pub total: u32,
    pub square_feet: Option<u32>,
}

impl PriceQuote {
    /// Square footage for display, "N/A" when the room pair is not in the table
    pub fn square_feet_label(&self) -> String {
        match self.square_feet {
            Some(sqft) => sqft.to_string(),
            None => "N/A".to_string(),
        }
    }
}

/// Snapshot held by the confirmation screen after a successful submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedBooking {
    pub request: BookingRequest,
    pub quote: PriceQuote,
    pub submitted_at: DateTime<Utc>,
}

impl ConfirmedBooking {
    pub fn headline(&self) -> &'static str {
        if self.request.is_estimate_only {
            "Estimate Request Submitted!"
        } else {
            "Booking Request Submitted!"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_setters_enforce_ranges() {
        let mut request = BookingRequest::new(ServiceType::Deep);
        assert!(request.set_bedrooms(6).is_ok());
        assert!(request.set_bathrooms(5).is_ok());

        assert_eq!(
            request.set_bedrooms(7),
            Err(ModelError::OutOfRange {
                field: "bedrooms",
                value: 7,
                min: 1,
                max: 6
            })
        );
        assert!(request.set_bathrooms(0).is_err());
        // Rejected values leave the previous selection alone
        assert_eq!(request.bedrooms, Some(6));
        assert_eq!(request.bathrooms, Some(5));
    }

    #[test]
    fn test_toggle_extra() {
        let mut request = BookingRequest::default();
        assert!(request.toggle_extra("oven"));
        assert!(request.extras.contains("oven"));
        assert!(!request.toggle_extra("oven"));
        assert!(request.extras.is_empty());
    }

    #[test]
    fn test_access_code_dropped_when_someone_home() {
        let mut request = BookingRequest::default();
        request.set_access(AccessMethod::AccessCode, Some("4821".into()));
        assert_eq!(request.access_code.as_deref(), Some("4821"));

        request.set_access(AccessMethod::SomeoneHome, Some("4821".into()));
        assert_eq!(request.access_code, None);

        request.set_access(AccessMethod::Other, Some("   ".into()));
        assert_eq!(request.access_code, None);
    }

    #[test]
    fn test_date_without_slots_is_not_scheduled() {
        let mut request = BookingRequest::default();
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        request.preferred_dates.insert(date);
        request.preferred_times.insert(date, Vec::new());
        assert!(!request.has_schedule());

        request
            .preferred_times
            .insert(date, vec!["9 AM - 10 AM".to_string()]);
        assert!(request.has_schedule());
    }

    #[test]
    fn test_draft_deserializes_with_defaults() {
        let request: BookingRequest = serde_json::from_str(
            r#"{"serviceType":"airbnb","bedrooms":3,"propertyCondition":"needs-attention"}"#,
        )
        .unwrap();
        assert_eq!(request.service_type, ServiceType::Airbnb);
        assert_eq!(request.bedrooms, Some(3));
        assert_eq!(request.bathrooms, None);
        assert_eq!(
            request.property_condition,
            Some(PropertyCondition::NeedsAttention)
        );
        assert!(request.send_notifications);
        assert!(!request.is_estimate_only);
    }
}
