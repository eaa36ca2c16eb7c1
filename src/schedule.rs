use crate::models::BookingRequest;
use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

/// One-hour arrival windows offered on every bookable day
pub const TIME_SLOTS: [&str; 9] = [
    "9 AM - 10 AM",
    "10 AM - 11 AM",
    "11 AM - 12 PM",
    "12 PM - 1 PM",
    "1 PM - 2 PM",
    "2 PM - 3 PM",
    "3 PM - 4 PM",
    "4 PM - 5 PM",
    "5 PM - 6 PM",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{0} falls on a weekend")]
    Weekend(NaiveDate),
    #[error("{0} is in the past")]
    Past(NaiveDate),
    #[error("unknown time slot {0:?}")]
    UnknownSlot(String),
}

/// Weekdays from today onward can be booked
pub fn check_bookable(date: NaiveDate, today: NaiveDate) -> Result<(), ScheduleError> {
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return Err(ScheduleError::Weekend(date));
    }
    if date < today {
        return Err(ScheduleError::Past(date));
    }
    Ok(())
}

/// Add a date to the preferred set
pub fn select_date(
    request: &mut BookingRequest,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ScheduleError> {
    check_bookable(date, today)?;
    request.preferred_dates.insert(date);
    Ok(())
}

/// Remove a date together with any slots picked for it
pub fn deselect_date(request: &mut BookingRequest, date: NaiveDate) {
    request.preferred_dates.remove(&date);
    request.preferred_times.remove(&date);
}

/// Flip a slot on a selected date. Returns whether the slot is now selected.
///
/// Slots are kept in catalog order. Selecting a slot on a date that is not in
/// the preferred set selects the date as well.
pub fn toggle_slot(
    request: &mut BookingRequest,
    date: NaiveDate,
    slot: &str,
    today: NaiveDate,
) -> Result<bool, ScheduleError> {
    let position = slot_position(slot).ok_or_else(|| ScheduleError::UnknownSlot(slot.to_string()))?;

    let slots = request.preferred_times.entry(date).or_default();
    if let Some(idx) = slots.iter().position(|s| s == slot) {
        slots.remove(idx);
        if slots.is_empty() {
            request.preferred_times.remove(&date);
        }
        return Ok(false);
    }

    if let Err(e) = check_bookable(date, today) {
        if slots.is_empty() {
            request.preferred_times.remove(&date);
        }
        return Err(e);
    }

    let insert_at = slots
        .iter()
        .position(|s| slot_position(s).map_or(false, |p| p > position))
        .unwrap_or(slots.len());
    slots.insert(insert_at, TIME_SLOTS[position].to_string());
    request.preferred_dates.insert(date);
    Ok(true)
}

fn slot_position(slot: &str) -> Option<usize> {
    TIME_SLOTS.iter().position(|s| *s == slot)
}

/// "Tue, Oct 20th" style label
pub fn format_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", date.format("%a, %b %-d"), suffix)
}

/// One line per scheduled date: "Tue, Oct 20th: 9 AM - 10 AM, 1 PM - 2 PM"
pub fn format_schedule(request: &BookingRequest) -> String {
    request
        .scheduled_dates()
        .map(|(date, slots)| {
            let slots: Vec<&str> = slots
                .iter()
                .map(|s| s.as_str())
                .filter(|s| !s.trim().is_empty())
                .collect();
            format!("{}: {}", format_date(*date), slots.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
