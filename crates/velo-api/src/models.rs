// Wire types for the bike-share backend.
//
// These mirror the JSON the backend sends and nothing more. `velo-core`
// converts them into domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An identifier that the backend may send as a JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RawId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// One entry of `GET /stations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSummaryPayload {
    pub id: RawId,
    pub name: String,
    #[serde(default)]
    pub available_bikes: Option<u32>,
}

/// Body of `GET /stations/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDetailsPayload {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bikes: Vec<BikePayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BikePayload {
    pub id: RawId,
    pub model: String,
    /// Percentage, 0–100.
    pub battery: u8,
    /// `"AVAILABLE"` or any other backend-defined status.
    pub status: String,
}

/// Body of `POST /bikes/{id}/book`. The backend omits `bookingId` when it
/// accepted the request but could not reserve the bike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    #[serde(default)]
    pub booking_id: Option<RawId>,
}
