// ── Backend service abstraction ──
//
// The controller talks to the backend only through `BikeService`, so tests
// can substitute a scripted fake. `HttpBikeService` is the production
// implementation over `velo_api::StationClient`.

use std::future::Future;

use tracing::debug;
use velo_api::{RawId, StationClient, TlsMode, TransportConfig};

use crate::config::{ServiceConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{BikeId, BookingResult, StationDetails, StationId, StationSummary};

/// Remote operations the station screens depend on.
///
/// `Ok(None)` means the backend answered without data. Callers treat that
/// as a silent no-op rather than an error.
pub trait BikeService: Send + Sync + 'static {
    fn list_stations(&self) -> impl Future<Output = Result<Vec<StationSummary>, CoreError>> + Send;

    fn fetch_station_details(
        &self,
        station_id: &StationId,
    ) -> impl Future<Output = Result<Option<StationDetails>, CoreError>> + Send;

    fn book_bike(
        &self,
        bike_id: &BikeId,
    ) -> impl Future<Output = Result<Option<BookingResult>, CoreError>> + Send;
}

/// [`BikeService`] backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpBikeService {
    client: StationClient,
}

impl HttpBikeService {
    pub fn new(config: &ServiceConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let client = StationClient::new(config.url.clone(), &transport)?;
        debug!(url = %config.url, "HTTP bike service ready");
        Ok(Self { client })
    }

    pub fn with_client(client: StationClient) -> Self {
        Self { client }
    }
}

impl BikeService for HttpBikeService {
    async fn list_stations(&self) -> Result<Vec<StationSummary>, CoreError> {
        let stations = self.client.list_stations().await?;
        Ok(stations.into_iter().map(StationSummary::from).collect())
    }

    async fn fetch_station_details(
        &self,
        station_id: &StationId,
    ) -> Result<Option<StationDetails>, CoreError> {
        let payload = self
            .client
            .get_station_details(&RawId::from(station_id))
            .await?;
        Ok(payload.map(StationDetails::from))
    }

    async fn book_bike(&self, bike_id: &BikeId) -> Result<Option<BookingResult>, CoreError> {
        let payload = self.client.book_bike(&RawId::from(bike_id)).await?;
        Ok(payload.map(BookingResult::from))
    }
}

fn build_transport(config: &ServiceConfig) -> TransportConfig {
    let transport = TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        api_token: None,
    };
    match &config.api_token {
        Some(token) => transport.with_api_token(token.clone()),
        None => transport,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
