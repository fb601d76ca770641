// Bike endpoints

use tracing::debug;

use crate::client::StationClient;
use crate::error::Error;
use crate::models::{BookingPayload, RawId};

impl StationClient {
    /// Book a bike.
    ///
    /// `POST /bikes/{id}/book`. `Ok(None)` and a payload without a
    /// `bookingId` both mean the backend did not reserve the bike.
    pub async fn book_bike(&self, bike_id: &RawId) -> Result<Option<BookingPayload>, Error> {
        let id = bike_id.to_string();
        let url = self.api_url(&["bikes", &id, "book"])?;
        debug!(bike_id = %id, "booking bike");
        self.post(url).await
    }
}
