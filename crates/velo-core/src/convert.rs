// ── Wire → domain conversion ──
//
// Maps `velo-api` payloads into canonical domain types. The mapping is
// lossless: whatever the backend reported is what the controller stores.

use velo_api::{BikePayload, BookingPayload, RawId, StationDetailsPayload, StationSummaryPayload};

use crate::model::{
    BikeId, BikeRecord, BikeStatus, BookingId, BookingResult, StationDetails, StationId,
    StationSummary,
};

impl From<RawId> for BikeId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self::Numeric(n),
            RawId::Text(s) => Self::Text(s),
        }
    }
}

impl From<&BikeId> for RawId {
    fn from(id: &BikeId) -> Self {
        match id {
            BikeId::Numeric(n) => Self::Number(*n),
            BikeId::Text(s) => Self::Text(s.clone()),
        }
    }
}

impl From<RawId> for StationId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self::new(n.to_string()),
            RawId::Text(s) => Self::from(s),
        }
    }
}

impl From<&StationId> for RawId {
    fn from(id: &StationId) -> Self {
        Self::Text(id.as_str().to_owned())
    }
}

impl From<RawId> for BookingId {
    fn from(raw: RawId) -> Self {
        Self::new(raw.to_string())
    }
}

impl From<BikePayload> for BikeRecord {
    fn from(p: BikePayload) -> Self {
        Self {
            id: p.id.into(),
            model: p.model,
            battery: p.battery,
            status: BikeStatus::from(p.status),
        }
    }
}

impl From<StationDetailsPayload> for StationDetails {
    fn from(p: StationDetailsPayload) -> Self {
        Self {
            id: p.id.map(StationId::from),
            name: p.name,
            bikes: p.bikes.into_iter().map(BikeRecord::from).collect(),
        }
    }
}

impl From<StationSummaryPayload> for StationSummary {
    fn from(p: StationSummaryPayload) -> Self {
        Self {
            id: p.id.into(),
            name: p.name,
            available_bikes: p.available_bikes,
        }
    }
}

impl From<BookingPayload> for BookingResult {
    fn from(p: BookingPayload) -> Self {
        Self {
            booking_id: p.booking_id.map(BookingId::from),
        }
    }
}
