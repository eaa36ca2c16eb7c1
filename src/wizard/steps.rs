use crate::models::BookingRequest;
use serde::Serialize;
use std::fmt;

/// Inputs that can block a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Bedrooms,
    Bathrooms,
    PropertyCondition,
    PreferredDates,
    PreferredTimes,
    StreetAddress,
    Name,
    Phone,
    Email,
}

impl Field {
    /// Inline message shown next to the input
    pub fn message(&self) -> &'static str {
        match self {
            Field::Bedrooms => "Please select number of bedrooms",
            Field::Bathrooms => "Please select number of bathrooms",
            Field::PropertyCondition => "Property condition is required",
            Field::PreferredDates => "Please select a date.",
            Field::PreferredTimes => "Please select at least one time slot.",
            Field::StreetAddress => "Please enter your service address",
            Field::Name => "Please enter your name",
            Field::Phone => "Please enter your phone number",
            Field::Email => "Please enter your email address",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Bedrooms => "bedrooms",
            Field::Bathrooms => "bathrooms",
            Field::PropertyCondition => "property condition",
            Field::PreferredDates => "preferred dates",
            Field::PreferredTimes => "preferred times",
            Field::StreetAddress => "street address",
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
        };
        f.write_str(name)
    }
}

/// Data-entry steps, in the order the customer sees them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Rooms,
    Condition,
    Extras,
    Schedule,
    AddressContact,
}

impl Step {
    pub const SEQUENCE: [Step; 5] = [
        Step::Rooms,
        Step::Condition,
        Step::Extras,
        Step::Schedule,
        Step::AddressContact,
    ];

    pub fn first() -> Step {
        Self::SEQUENCE[0]
    }

    pub fn last() -> Step {
        Self::SEQUENCE[Self::SEQUENCE.len() - 1]
    }

    pub fn index(self) -> usize {
        Self::SEQUENCE
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Option<Step> {
        Self::SEQUENCE.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Self::SEQUENCE[i])
    }

    pub fn is_last(self) -> bool {
        self == Self::last()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Rooms => "Bedrooms & Bathrooms",
            Step::Condition => "Property Condition",
            Step::Extras => "Extras & Access",
            Step::Schedule => "Preferred Times",
            Step::AddressContact => "Address & Contact",
        }
    }

    /// Every field this step can flag
    pub fn required_fields(self) -> &'static [Field] {
        match self {
            Step::Rooms => &[Field::Bedrooms, Field::Bathrooms],
            Step::Condition => &[Field::PropertyCondition],
            Step::Extras => &[],
            Step::Schedule => &[Field::PreferredDates, Field::PreferredTimes],
            Step::AddressContact => &[Field::StreetAddress, Field::Name, Field::Phone, Field::Email],
        }
    }

    /// Fields currently blocking this step; empty when it may be left
    pub fn missing_fields(self, request: &BookingRequest) -> Vec<Field> {
        self.required_fields()
            .iter()
            .copied()
            .filter(|field| is_missing(*field, request))
            .collect()
    }

    pub fn is_valid(self, request: &BookingRequest) -> bool {
        self.missing_fields(request).is_empty()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

fn is_missing(field: Field, request: &BookingRequest) -> bool {
    match field {
        Field::Bedrooms => request.bedrooms.is_none(),
        Field::Bathrooms => request.bathrooms.is_none(),
        Field::PropertyCondition => request.property_condition.is_none(),
        Field::PreferredDates => !request.is_estimate_only && request.preferred_dates.is_empty(),
        // Only reported once a date is picked, so the customer sees one message at a time
        Field::PreferredTimes => {
            !request.is_estimate_only
                && !request.preferred_dates.is_empty()
                && !request.has_schedule()
        }
        Field::StreetAddress => blank(&request.street_address),
        Field::Name => blank(&request.name),
        Field::Phone => blank(&request.phone),
        Field::Email => blank(&request.email),
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}
