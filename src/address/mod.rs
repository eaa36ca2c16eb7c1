pub mod debounce;
pub mod places;
pub mod traits;
pub mod types;

pub use debounce::SuggestionDebouncer;
pub use places::PlacesSuggester;
