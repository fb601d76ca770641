//! Core of the velo bike-share client.
//!
//! The centrepiece is [`StationDetailController`]: mounted with a
//! [`StationId`], it fetches the station's bikes through a
//! [`BikeService`], exposes a [`ViewState`] for rendering, and books a
//! bike on request. Outcomes reach the UI through a [`ScreenHost`] and
//! the [`BookingStore`] through a [`StoreHandle`].
//!
//! ```text
//! ScreenHost ◀── StationDetailController ──▶ BikeService (HTTP)
//!                    │ watch<ViewState>
//!                    └── StoreHandle ──mpsc──▶ BookingStore reducer
//! ```

pub mod config;
pub mod controller;
mod convert;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod model;
pub mod service;
pub mod store;
pub mod view;

pub use config::{DEFAULT_BATTERY_THRESHOLD, ServiceConfig, TlsVerification};
pub use controller::{BOOKING_ERROR_TITLE, DETAILS_ERROR_TITLE, StationDetailController};
pub use error::CoreError;
pub use host::ScreenHost;
pub use lifecycle::RequestPhase;
pub use model::{
    BikeId, BikeRecord, BikeStatus, BookedBike, BookingId, BookingResult, StationDetails,
    StationId, StationSummary,
};
pub use service::{BikeService, HttpBikeService};
pub use store::{BookingStore, STORE_CHANNEL_SIZE, StoreEvent, StoreHandle, spawn_reducer};
pub use view::{BikeRow, Content, ViewState};
