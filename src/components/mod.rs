// Export components
pub mod google_calendar;
pub mod intent;

pub use google_calendar::{provider_for, CalendarProvider};
pub use intent::{extractor_for, IntentExtractor};
