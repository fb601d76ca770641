// Station endpoints

use tracing::debug;

use crate::client::StationClient;
use crate::error::Error;
use crate::models::{RawId, StationDetailsPayload, StationSummaryPayload};

impl StationClient {
    /// List every station the backend knows about.
    ///
    /// `GET /stations`. An empty answer is an empty list.
    pub async fn list_stations(&self) -> Result<Vec<StationSummaryPayload>, Error> {
        let url = self.api_url(&["stations"])?;
        debug!("listing stations");
        Ok(self.get(url).await?.unwrap_or_default())
    }

    /// Fetch the bikes parked at one station.
    ///
    /// `GET /stations/{id}`. Returns `Ok(None)` when the backend answers
    /// with no data for that station.
    pub async fn get_station_details(
        &self,
        station_id: &RawId,
    ) -> Result<Option<StationDetailsPayload>, Error> {
        let id = station_id.to_string();
        let url = self.api_url(&["stations", &id])?;
        debug!(station_id = %id, "fetching station details");
        self.get(url).await
    }
}
