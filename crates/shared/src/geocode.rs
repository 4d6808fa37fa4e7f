use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::LatLng;

/// Address stored when reverse geocoding fails for any reason.
pub const FALLBACK_ADDRESS: &str = "Address not found";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("response has no display name")]
    MissingDisplayName,
    #[error("request timed out")]
    Timeout,
}

/// Reverse geocoding service: coordinates in, human-readable address out.
#[async_trait(?Send)]
pub trait Geocoder {
    async fn reverse(&self, position: LatLng) -> Result<String, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// Build the reverse lookup URL for `endpoint`.
pub fn reverse_url(endpoint: &str, position: LatLng) -> String {
    format!(
        "{}?format=json&lat={}&lon={}",
        endpoint, position.lat, position.lng
    )
}

/// Extract `display_name` from a reverse geocoding JSON body.
pub fn parse_display_name(body: &str) -> Result<String, GeocodeError> {
    let resp: ReverseResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse(e.to_string()))?;
    match resp.display_name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(GeocodeError::MissingDisplayName),
    }
}

/// One best-effort lookup. Failures are logged and replaced by
/// [`FALLBACK_ADDRESS`].
pub async fn resolve_address<G: Geocoder + ?Sized>(geocoder: &G, position: LatLng) -> String {
    match geocoder.reverse(position).await {
        Ok(address) => address,
        Err(e) => {
            tracing::warn!(
                lat = position.lat,
                lng = position.lng,
                error = %e,
                "Error fetching address"
            );
            FALLBACK_ADDRESS.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<String, GeocodeError>);

    #[async_trait(?Send)]
    impl Geocoder for Fixed {
        async fn reverse(&self, _position: LatLng) -> Result<String, GeocodeError> {
            self.0.clone()
        }
    }

    #[test]
    fn test_reverse_url() {
        let url = reverse_url(
            "https://nominatim.openstreetmap.org/reverse",
            LatLng::new(51.5, -0.09),
        );
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/reverse?format=json&lat=51.5&lon=-0.09"
        );
    }

    #[test]
    fn test_parse_display_name() {
        let body = r#"{"place_id":1,"display_name":"10 Downing St","address":{}}"#;
        assert_eq!(parse_display_name(body).unwrap(), "10 Downing St");
    }

    #[test]
    fn test_parse_error_object_has_no_display_name() {
        let body = r#"{"error":"Unable to geocode"}"#;
        assert_eq!(
            parse_display_name(body),
            Err(GeocodeError::MissingDisplayName)
        );
    }

    #[test]
    fn test_parse_empty_display_name() {
        assert_eq!(
            parse_display_name(r#"{"display_name":""}"#),
            Err(GeocodeError::MissingDisplayName)
        );
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(
            parse_display_name("<html>502</html>"),
            Err(GeocodeError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_non_string_display_name() {
        assert!(matches!(
            parse_display_name(r#"{"display_name":42}"#),
            Err(GeocodeError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_address_success() {
        let geocoder = Fixed(Ok("Baker St".to_string()));
        let address = resolve_address(&geocoder, LatLng::new(0.0, 0.0)).await;
        assert_eq!(address, "Baker St");
    }

    #[tokio::test]
    async fn test_resolve_address_falls_back() {
        for err in [
            GeocodeError::Network("offline".to_string()),
            GeocodeError::Status(503),
            GeocodeError::Timeout,
            GeocodeError::MissingDisplayName,
        ] {
            let geocoder = Fixed(Err(err));
            let address = resolve_address(&geocoder, LatLng::new(0.0, 0.0)).await;
            assert_eq!(address, "Address not found");
        }
    }
}
