use serde::{Deserialize, Serialize};

/// Text shown in place of an empty remark.
pub const NO_REMARKS: &str = "No remarks";

pub type PinId = String;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// A saved or drafted map annotation.
///
/// The field names match the JSON layout kept in browser storage, so data
/// written by earlier versions of the widget loads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub address: String,
}

impl Pin {
    /// A fresh draft: no remark, address not yet resolved.
    pub fn draft(id: PinId, position: LatLng) -> Self {
        Self {
            id,
            lat: position.lat,
            lng: position.lng,
            remarks: String::new(),
            address: String::new(),
        }
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Remark as displayed in the list panel and marker popups.
    pub fn display_remarks(&self) -> &str {
        if self.remarks.is_empty() {
            NO_REMARKS
        } else {
            &self.remarks
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_serializes_with_storage_field_names() {
        let pin = Pin {
            id: "1712345678901".to_string(),
            lat: 51.5,
            lng: -0.09,
            remarks: "Cafe".to_string(),
            address: "10 Downing St".to_string(),
        };
        let json = serde_json::to_value(&pin).unwrap();
        assert_eq!(json["id"], "1712345678901");
        assert_eq!(json["lat"], 51.5);
        assert_eq!(json["lng"], -0.09);
        assert_eq!(json["remarks"], "Cafe");
        assert_eq!(json["address"], "10 Downing St");
    }

    #[test]
    fn test_pin_deserializes_without_address() {
        // Drafts saved mid-flight by older builds never carried an address
        let json = r#"{"id":"1","lat":1.0,"lng":2.0,"remarks":"x"}"#;
        let pin: Pin = serde_json::from_str(json).unwrap();
        assert_eq!(pin.address, "");
        assert_eq!(pin.remarks, "x");
    }

    #[test]
    fn test_draft_starts_empty() {
        let pin = Pin::draft("7".to_string(), LatLng::new(10.0, 20.0));
        assert_eq!(pin.id, "7");
        assert!(pin.remarks.is_empty());
        assert!(pin.address.is_empty());
        assert_eq!(pin.position(), LatLng::new(10.0, 20.0));
    }

    #[test]
    fn test_display_remarks_placeholder() {
        let mut pin = Pin::draft("1".to_string(), LatLng::new(0.0, 0.0));
        assert_eq!(pin.display_remarks(), "No remarks");
        pin.remarks = "Bench".to_string();
        assert_eq!(pin.display_remarks(), "Bench");
    }

    #[test]
    fn test_latlng_is_finite() {
        assert!(LatLng::new(1.0, 2.0).is_finite());
        assert!(!LatLng::new(f64::NAN, 2.0).is_finite());
        assert!(!LatLng::new(1.0, f64::INFINITY).is_finite());
    }
}
