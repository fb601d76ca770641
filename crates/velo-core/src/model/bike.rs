// ── Bike domain types ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BikeId, BookingId};

/// Wire value of [`BikeStatus::Available`].
pub const STATUS_AVAILABLE: &str = "AVAILABLE";

/// Availability of a bike. Anything but `AVAILABLE` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BikeStatus {
    Available,
    Other(String),
}

impl BikeStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => STATUS_AVAILABLE,
            Self::Other(s) => s,
        }
    }
}

impl From<String> for BikeStatus {
    fn from(s: String) -> Self {
        if s == STATUS_AVAILABLE {
            Self::Available
        } else {
            Self::Other(s)
        }
    }
}

impl From<&str> for BikeStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<BikeStatus> for String {
    fn from(status: BikeStatus) -> Self {
        match status {
            BikeStatus::Available => STATUS_AVAILABLE.to_owned(),
            BikeStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bike parked at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BikeRecord {
    pub id: BikeId,
    pub model: String,
    /// Percentage, 0–100.
    pub battery: u8,
    pub status: BikeStatus,
}

impl BikeRecord {
    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }

    /// Battery strictly below `threshold` percent.
    pub fn is_battery_low(&self, threshold: u8) -> bool {
        self.battery < threshold
    }
}

/// Outcome of a booking request that the backend answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingResult {
    /// Present only when the bike was actually reserved.
    pub booking_id: Option<BookingId>,
}

/// A bike the user booked, as recorded by the booking store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedBike {
    pub bike: BikeRecord,
    pub booking_id: BookingId,
    pub booked_at: DateTime<Utc>,
}
