use serde::{Deserialize, Serialize};

use crate::models::LatLng;
use crate::store::DEFAULT_STORAGE_KEY;
use crate::viewport::Viewport;

pub const DEFAULT_CENTER: LatLng = LatLng::new(51.505, -0.09);
pub const DEFAULT_ZOOM: u8 = 13;
/// Zoom used when jumping to a pin from the list.
pub const NAVIGATE_ZOOM: u8 = 13;
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 19;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const GEOCODE_TIMEOUT_MS: u64 = 10_000;

/// Geometry of the marker image, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub size: [f64; 2],
    /// Point of the image that sits on the pin's coordinates.
    pub anchor: [f64; 2],
    /// Where popups attach, relative to the anchor.
    pub popup_anchor: [f64; 2],
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            size: [38.0, 95.0],
            anchor: [22.0, 94.0],
            popup_anchor: [-3.0, -76.0],
        }
    }
}

impl MarkerIcon {
    /// Top-left corner of the icon image for a marker at `(x, y)`.
    pub fn image_origin(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.anchor[0], y - self.anchor[1])
    }

    /// Tip of the popup for a marker at `(x, y)`.
    pub fn popup_tip(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.popup_anchor[0], y + self.popup_anchor[1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: u8,
    pub navigate_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tile_url: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
    pub icon: MarkerIcon,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            navigate_zoom: NAVIGATE_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            tile_url: OSM_TILE_URL.to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: OSM_ATTRIBUTION.to_string(),
            icon: MarkerIcon::default(),
        }
    }
}

impl MapConfig {
    pub fn initial_viewport(&self) -> Viewport {
        Viewport::new(self.center, self.clamp_zoom(i32::from(self.zoom)))
    }

    /// Zoom range actually used: the configured bounds, ordered and kept
    /// within [`MIN_ZOOM`, `MAX_ZOOM`].
    pub fn zoom_bounds(&self) -> (u8, u8) {
        let lo = self.min_zoom.min(self.max_zoom).clamp(MIN_ZOOM, MAX_ZOOM);
        let hi = self.min_zoom.max(self.max_zoom).clamp(MIN_ZOOM, MAX_ZOOM);
        (lo, hi)
    }

    pub fn clamp_zoom(&self, zoom: i32) -> u8 {
        let (lo, hi) = self.zoom_bounds();
        zoom.clamp(i32::from(lo), i32::from(hi)) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_REVERSE_URL.to_string(),
            timeout_ms: GEOCODE_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub storage_key: String,
    pub map: MapConfig,
    pub geocoder: GeocoderConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            map: MapConfig::default(),
            geocoder: GeocoderConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = WidgetConfig::default();
        assert_eq!(cfg.storage_key, "pins");
        assert_eq!(cfg.map.center, LatLng::new(51.505, -0.09));
        assert_eq!(cfg.map.zoom, 13);
        assert_eq!(cfg.map.navigate_zoom, 13);
        assert_eq!(cfg.geocoder.endpoint, "https://nominatim.openstreetmap.org/reverse");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"storageKey":"my-pins","map":{"zoom":5},"geocoder":{"timeoutMs":2500}}"#;
        let cfg: WidgetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.storage_key, "my-pins");
        assert_eq!(cfg.map.zoom, 5);
        assert_eq!(cfg.map.tile_url, OSM_TILE_URL);
        assert_eq!(cfg.geocoder.timeout_ms, 2500);
        assert_eq!(cfg.geocoder.endpoint, NOMINATIM_REVERSE_URL);
    }

    #[test]
    fn test_clamp_zoom() {
        let cfg = MapConfig::default();
        assert_eq!(cfg.clamp_zoom(0), 1);
        assert_eq!(cfg.clamp_zoom(25), 19);
        assert_eq!(cfg.clamp_zoom(-3), 1);
        assert_eq!(cfg.clamp_zoom(13), 13);
    }

    #[test]
    fn test_clamp_zoom_with_bad_bounds() {
        let json = r#"{"minZoom": 15, "maxZoom": 3, "zoom": 40}"#;
        let cfg: MapConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.zoom_bounds(), (3, 15));
        assert_eq!(cfg.clamp_zoom(20), 15);
        assert_eq!(cfg.initial_viewport().zoom, 15);

        let wide: MapConfig = serde_json::from_str(r#"{"minZoom": 0, "maxZoom": 200}"#).unwrap();
        assert_eq!(wide.zoom_bounds(), (MIN_ZOOM, MAX_ZOOM));
        assert_eq!(wide.clamp_zoom(100), MAX_ZOOM);
    }

    #[test]
    fn test_initial_viewport() {
        let v = MapConfig::default().initial_viewport();
        assert_eq!(v.center, DEFAULT_CENTER);
        assert_eq!(v.zoom, 13);
    }

    #[test]
    fn test_icon_geometry() {
        let icon = MarkerIcon::default();
        assert_eq!(icon.image_origin(100.0, 200.0), (78.0, 106.0));
        assert_eq!(icon.popup_tip(100.0, 200.0), (97.0, 124.0));
    }
}
