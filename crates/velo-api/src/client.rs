// Backend HTTP client
//
// Wraps `reqwest::Client` with URL construction and response decoding.
// Endpoint methods live in `stations.rs` and `bikes.rs` as inherent
// methods so this module stays focused on transport mechanics.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the bike-share backend.
///
/// Every request helper returns `Ok(None)` for an empty answer (HTTP 204,
/// an empty body, or a JSON `null`). The backend uses that to mean "no
/// data" without it being an error.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StationClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root (e.g. `https://bikes.example.com/api`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append percent-encoded path segments to the base URL.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode an optional JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        Self::parse_response(resp).await
    }

    /// Send a body-less POST request and decode an optional JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        debug!("POST {}", url);

        let resp = self.http.post(url).send().await.map_err(Error::Transport)?;

        Self::parse_response(resp).await
    }

    /// Map the HTTP status to an [`Error`] or decode the body.
    async fn parse_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("backend refused credentials (HTTP {})", status.as_u16()),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                path: resp.url().path().to_owned(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body),
            });
        }

        if status == StatusCode::NO_CONTENT {
            trace!("204 No Content");
            return Ok(None);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        if body.trim().is_empty() {
            trace!("empty response body");
            return Ok(None);
        }

        serde_json::from_str::<Option<T>>(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
