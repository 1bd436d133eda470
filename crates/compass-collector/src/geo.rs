use std::time::Duration;

use serde::Deserialize;
use tokio::sync::OnceCell;

use compass_core::event::Location;

/// Best-effort IP geolocation via an ipapi-style JSON endpoint.
///
/// Failure is never surfaced: any network error, timeout, or malformed body
/// degrades to `None` and the event goes out without a location. The first
/// successful (or failed) lookup is cached for the lifetime of this client —
/// one page view, one geolocation round-trip, however many events follow.
pub struct GeoClient {
    http: reqwest::Client,
    endpoint: String,
    cached: OnceCell<Option<Location>>,
}

/// The subset of the third-party response we care about. Field names follow
/// the ipapi.co contract (`country_name`, not `country`).
#[derive(Debug, Deserialize)]
struct GeoResponse {
    ip: Option<String>,
    country_name: Option<String>,
    region: Option<String>,
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
}

impl GeoClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into(),
            cached: OnceCell::new(),
        })
    }

    /// Cached lookup. The slow path runs at most once per client.
    pub async fn lookup(&self) -> Option<Location> {
        self.cached.get_or_init(|| self.fetch()).await.clone()
    }

    async fn fetch(&self) -> Option<Location> {
        let response = match self.http.get(&self.endpoint).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(error = %e, "geolocation lookup failed");
                return None;
            }
        };
        match response.json::<GeoResponse>().await {
            Ok(geo) => Some(Location {
                ip: geo.ip,
                country: geo.country_name,
                region: geo.region,
                city: geo.city,
                latitude: geo.latitude,
                longitude: geo.longitude,
                timezone: geo.timezone,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "geolocation response malformed");
                None
            }
        }
    }
}
