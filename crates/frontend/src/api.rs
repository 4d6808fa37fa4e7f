use async_trait::async_trait;
use futures::future::{self, Either};
use gloo_timers::future::TimeoutFuture;
use pindrop_shared::config::GeocoderConfig;
use pindrop_shared::geocode::{parse_display_name, reverse_url, GeocodeError, Geocoder};
use pindrop_shared::models::LatLng;

/// Reverse geocoding against a Nominatim-compatible endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
    timeout_ms: u32,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            timeout_ms: timeout_ms(config.timeout_ms),
        }
    }

    async fn fetch(&self, position: LatLng) -> Result<String, GeocodeError> {
        let url = reverse_url(&self.endpoint, position);
        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        check_status(resp.status())?;

        let body = resp
            .text()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        parse_display_name(&body)
    }
}

#[async_trait(?Send)]
impl Geocoder for NominatimGeocoder {
    async fn reverse(&self, position: LatLng) -> Result<String, GeocodeError> {
        let request = Box::pin(self.fetch(position));
        let timeout = TimeoutFuture::new(self.timeout_ms);
        match future::select(request, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(GeocodeError::Timeout),
        }
    }
}

/// Anything but a 2xx is a failed lookup.
fn check_status(status: reqwest::StatusCode) -> Result<(), GeocodeError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(GeocodeError::Status(status.as_u16()))
    }
}

/// Browser timers take a `u32` of milliseconds.
fn timeout_ms(ms: u64) -> u32 {
    u32::try_from(ms).unwrap_or(u32::MAX)
}
