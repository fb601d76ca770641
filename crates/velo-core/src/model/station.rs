// ── Station domain types ──

use serde::{Deserialize, Serialize};

use super::bike::BikeRecord;
use super::ids::{BikeId, StationId};

/// One entry of the station listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSummary {
    pub id: StationId,
    pub name: String,
    /// Bikes currently available, when the backend reports it.
    pub available_bikes: Option<u32>,
}

/// The bikes at one station, exactly as the backend reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationDetails {
    pub id: Option<StationId>,
    pub name: Option<String>,
    pub bikes: Vec<BikeRecord>,
}

impl StationDetails {
    pub fn bike(&self, id: &BikeId) -> Option<&BikeRecord> {
        self.bikes.iter().find(|b| &b.id == id)
    }

    pub fn available_count(&self) -> usize {
        self.bikes.iter().filter(|b| b.is_available()).count()
    }
}
