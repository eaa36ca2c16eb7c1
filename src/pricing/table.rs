use crate::models::{PropertyCondition, ServiceType};

/// One row of the rate card, keyed by room counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRow {
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub square_feet: u32,
    pub regular: u32,
    pub deep: u32,
    pub move_in_out: u32,
    pub airbnb: u32,
}

impl RateRow {
    pub fn price_for(&self, service: ServiceType) -> u32 {
        match service {
            ServiceType::Regular => self.regular,
            ServiceType::Deep => self.deep,
            ServiceType::Move => self.move_in_out,
            ServiceType::Airbnb => self.airbnb,
        }
    }
}

const fn row(
    bedrooms: u8,
    bathrooms: u8,
    square_feet: u32,
    prices: [u32; 4],
) -> RateRow {
    RateRow {
        bedrooms,
        bathrooms,
        square_feet,
        regular: prices[0],
        deep: prices[1],
        move_in_out: prices[2],
        airbnb: prices[3],
    }
}

/// Rate card. Pairs missing here fall back to the flat service minimum.
pub const RATE_CARD: &[RateRow] = &[
    row(1, 1, 700, [119, 149, 149, 129]),
    row(1, 2, 900, [129, 169, 169, 139]),
    row(2, 1, 1000, [139, 179, 179, 149]),
    row(2, 2, 1200, [149, 199, 199, 159]),
    row(2, 3, 1400, [169, 219, 219, 179]),
    row(3, 1, 1300, [159, 209, 209, 169]),
    row(3, 2, 1500, [169, 229, 229, 179]),
    row(3, 3, 1700, [189, 249, 249, 199]),
    row(4, 2, 1900, [189, 259, 259, 199]),
    row(4, 3, 2200, [209, 289, 289, 219]),
    row(4, 4, 2500, [229, 319, 319, 239]),
    row(5, 2, 2400, [219, 309, 309, 229]),
    row(5, 3, 2700, [239, 339, 339, 249]),
    row(5, 4, 3000, [259, 369, 369, 269]),
    row(6, 3, 3200, [259, 379, 379, 269]),
    row(6, 4, 3500, [279, 409, 409, 289]),
    row(6, 5, 3800, [299, 439, 439, 309]),
];

pub fn find_row(bedrooms: u8, bathrooms: u8) -> Option<&'static RateRow> {
    RATE_CARD
        .iter()
        .find(|r| r.bedrooms == bedrooms && r.bathrooms == bathrooms)
}

/// Lowest base price a service is ever quoted at
pub fn flat_base_price(service: ServiceType) -> u32 {
    match service {
        ServiceType::Regular => 119,
        ServiceType::Deep => 149,
        ServiceType::Move => 149,
        ServiceType::Airbnb => 129,
    }
}

pub fn condition_surcharge(condition: PropertyCondition) -> u32 {
    match condition {
        PropertyCondition::WellMaintained => 0,
        PropertyCondition::Fair => 100,
        PropertyCondition::NeedsAttention => 200,
    }
}

pub const PET_SURCHARGE: u32 = 20;

/// Recurring plans take 15% off
pub const RECURRING_DISCOUNT_PERCENT: u32 = 15;

/// Add-on catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extra {
    pub id: &'static str,
    pub label: &'static str,
    pub price: u32,
}

pub const EXTRAS: &[Extra] = &[
    Extra { id: "cabinet", label: "Inside Cabinet", price: 30 },
    Extra { id: "fridge", label: "Inside Fridge", price: 40 },
    Extra { id: "oven", label: "Inside Oven", price: 40 },
    Extra { id: "laundry", label: "Laundry Wash & Dry", price: 20 },
    Extra { id: "window", label: "Interior Windows Inside", price: 20 },
    Extra { id: "dish", label: "Dish", price: 20 },
    Extra { id: "glass-door", label: "Glass Door", price: 20 },
    Extra { id: "door", label: "Patio Door", price: 50 },
    Extra { id: "garage", label: "Garage", price: 50 },
];

pub fn find_extra(id: &str) -> Option<&'static Extra> {
    EXTRAS.iter().find(|e| e.id == id)
}
