// velo-api: Async Rust client for the velo bike-share backend

mod bikes;
pub mod client;
pub mod error;
pub mod models;
mod stations;
pub mod transport;

pub use client::StationClient;
pub use error::Error;
pub use models::{BikePayload, BookingPayload, RawId, StationDetailsPayload, StationSummaryPayload};
pub use transport::{TlsMode, TransportConfig};
