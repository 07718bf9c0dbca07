//! Domain models for price-spread scanning.

mod observation;
mod opportunity;
mod report;

pub use observation::PriceObservation;
pub use opportunity::Opportunity;
pub use report::{ScanReport, VenueStatus};
