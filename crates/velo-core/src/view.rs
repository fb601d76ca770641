// ── Observable view state ──
//
// What the station detail screen renders. The controller owns the only
// writer (a `watch::Sender`); renderers read snapshots.

use std::sync::Arc;

use crate::lifecycle::RequestPhase;
use crate::model::{BikeId, BikeRecord, BikeStatus, StationDetails, StationId};

/// Snapshot of the station detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub station_id: StationId,
    /// Name used for the screen title.
    pub station_name: String,
    /// Last successfully fetched details. `None` until the first fetch for
    /// the current station succeeds with data.
    pub details: Option<Arc<StationDetails>>,
    pub details_phase: RequestPhase,
    pub booking_phase: RequestPhase,
    /// Bike of the most recent booking request.
    pub booking_bike: Option<BikeId>,
}

/// What occupies the list area of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Details are loading; the list is not shown.
    Hidden,
    /// One row per bike, in backend order. May be empty.
    Bikes(Vec<BikeRow>),
}

impl ViewState {
    pub fn new(station_id: StationId, station_name: impl Into<String>) -> Self {
        Self {
            station_id,
            station_name: station_name.into(),
            details: None,
            details_phase: RequestPhase::Idle,
            booking_phase: RequestPhase::Idle,
            booking_bike: None,
        }
    }

    pub fn details_loading(&self) -> bool {
        self.details_phase.is_loading()
    }

    pub fn booking_loading(&self) -> bool {
        self.booking_phase.is_loading()
    }

    /// The loading indicator is visible whenever either request is in
    /// flight.
    pub fn shows_loading_indicator(&self) -> bool {
        self.details_loading() || self.booking_loading()
    }

    /// The list area, hidden while details are loading.
    pub fn content(&self, battery_threshold: u8) -> Content {
        if self.details_loading() {
            return Content::Hidden;
        }
        let rows = self
            .details
            .as_deref()
            .map(|d| {
                d.bikes
                    .iter()
                    .map(|b| BikeRow::from_record(b, battery_threshold))
                    .collect()
            })
            .unwrap_or_default();
        Content::Bikes(rows)
    }

    /// Bike record by id from the current details.
    pub fn bike(&self, id: &BikeId) -> Option<&BikeRecord> {
        self.details.as_deref().and_then(|d| d.bike(id))
    }
}

/// One rendered bike entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BikeRow {
    pub id: BikeId,
    pub model: String,
    pub battery: u8,
    /// Battery below the configured threshold.
    pub battery_low: bool,
    pub status: BikeStatus,
    /// Status other than `AVAILABLE`.
    pub status_flagged: bool,
    /// The book action is enabled only for available bikes.
    pub can_book: bool,
}

impl BikeRow {
    pub fn from_record(bike: &BikeRecord, battery_threshold: u8) -> Self {
        let available = bike.is_available();
        Self {
            id: bike.id.clone(),
            model: bike.model.clone(),
            battery: bike.battery,
            battery_low: bike.is_battery_low(battery_threshold),
            status: bike.status.clone(),
            status_flagged: !available,
            can_book: available,
        }
    }
}
