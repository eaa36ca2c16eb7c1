use crate::models::{BookingRequest, ConfirmedBooking};
use crate::wizard::{Advanced, Phase, Step, Wizard, WizardError};
use crate::{pricing, schedule};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Feed a saved draft through the wizard one step at a time until it is
/// submitted. Dates are checked against `today`.
///
/// The wizard must already be past service selection.
pub async fn replay(
    wizard: &mut Wizard,
    draft: &BookingRequest,
    today: NaiveDate,
) -> Result<ConfirmedBooking> {
    loop {
        let Some(step) = wizard.current_step() else {
            break;
        };

        let quote = wizard.update(|request| copy_step(step, draft, request, today))?;
        info!(
            "Step {}/{} {} - estimate ${}",
            step.index() + 1,
            Step::SEQUENCE.len(),
            step,
            quote.total
        );

        match wizard.advance().await {
            Ok(Advanced::Moved(_)) => {}
            Ok(Advanced::Submitted) => break,
            Err(WizardError::Invalid { step, fields }) => {
                for field in &fields {
                    warn!("   {}", field.message());
                }
                if step == Step::Schedule {
                    bail!(
                        "{} is incomplete in the draft (dates must be weekdays from {} on)",
                        step,
                        today
                    );
                }
                bail!("{} is incomplete in the draft", step);
            }
            Err(e) => return Err(e.into()),
        }
    }

    match wizard.phase() {
        Phase::Confirmation(confirmed) => Ok(confirmed.clone()),
        other => bail!("booking stopped while {}", other.name()),
    }
}

/// Copy the fields a step collects from the draft into the live request
fn copy_step(step: Step, draft: &BookingRequest, request: &mut BookingRequest, today: NaiveDate) {
    match step {
        Step::Rooms => {
            if let Some(bedrooms) = draft.bedrooms {
                if let Err(e) = request.set_bedrooms(bedrooms) {
                    warn!("Skipping bedrooms: {}", e);
                }
            }
            if let Some(bathrooms) = draft.bathrooms {
                if let Err(e) = request.set_bathrooms(bathrooms) {
                    warn!("Skipping bathrooms: {}", e);
                }
            }
        }
        Step::Condition => {
            request.property_condition = draft.property_condition;
            request.has_pets = draft.has_pets;
        }
        Step::Extras => {
            for id in &draft.extras {
                if pricing::find_extra(id).is_none() {
                    warn!("Unknown extra {:?} will not be charged", id);
                }
                if !request.extras.contains(id) {
                    request.toggle_extra(id);
                }
            }
            if let Some(method) = draft.access_method {
                request.set_access(method, draft.access_code.clone());
            }
            request.special_notes = draft.special_notes.clone();
            request.recurring_plan = draft.recurring_plan;
        }
        Step::Schedule => {
            request.is_estimate_only = draft.is_estimate_only;
            for (date, slots) in &draft.preferred_times {
                if !draft.preferred_dates.contains(date) {
                    warn!("Ignoring times for {}, it is not a preferred date", date);
                    continue;
                }
                for slot in slots {
                    let selected = request
                        .preferred_times
                        .get(date)
                        .map_or(false, |s| s.contains(slot));
                    if selected {
                        continue;
                    }
                    if let Err(e) = schedule::toggle_slot(request, *date, slot, today) {
                        warn!("Skipping {} {}: {}", date, slot, e);
                    }
                }
            }
        }
        Step::AddressContact => {
            request.street_address = draft.street_address.clone();
            request.unit_number = draft.unit_number.clone();
            request.name = draft.name.clone();
            request.phone = draft.phone.clone();
            request.email = draft.email.clone();
            request.send_notifications = draft.send_notifications;
        }
    }
}
