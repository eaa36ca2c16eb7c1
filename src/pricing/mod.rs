pub mod table;

use crate::models::{BookingRequest, PriceQuote};

pub use table::find_extra;

/// Price a (possibly half-filled) booking request.
///
/// Pure and total: missing or unknown inputs contribute nothing, so this is
/// safe to call after every edit.
pub fn compute_price(request: &BookingRequest) -> PriceQuote {
    let row = match (request.bedrooms, request.bathrooms) {
        (Some(bed), Some(bath)) => table::find_row(bed, bath),
        _ => None,
    };

    let flat = table::flat_base_price(request.service_type);
    let listed = row.map(|r| r.price_for(request.service_type)).unwrap_or(0);
    let mut running = flat.max(listed);

    if let Some(condition) = request.property_condition {
        running += table::condition_surcharge(condition);
    }

    running += request
        .extras
        .iter()
        .filter_map(|id| find_extra(id))
        .map(|extra| extra.price)
        .sum::<u32>();

    if request.has_pets {
        running += table::PET_SURCHARGE;
    }

    let discount = if request.recurring_plan.is_some() {
        percent_rounded(running, table::RECURRING_DISCOUNT_PERCENT)
    } else {
        0
    };

    PriceQuote {
        subtotal: running,
        discount,
        total: running - discount,
        square_feet: row.map(|r| r.square_feet),
    }
}

/// `amount * percent / 100`, rounded half up to the nearest dollar
fn percent_rounded(amount: u32, percent: u32) -> u32 {
    (amount * percent + 50) / 100
}
