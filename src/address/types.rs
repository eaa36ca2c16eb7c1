use serde::{Deserialize, Serialize};

/// One autocomplete candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressSuggestion {
    /// Short text shown in the dropdown
    pub label: String,
    /// Full formatted address stored on the booking when picked
    pub full_address: String,
    pub place_id: Option<String>,
}
