// ── Domain model ──

pub mod bike;
pub mod ids;
pub mod station;

pub use bike::{BikeRecord, BikeStatus, BookedBike, BookingResult, STATUS_AVAILABLE};
pub use ids::{BikeId, BookingId, StationId};
pub use station::{StationDetails, StationSummary};
