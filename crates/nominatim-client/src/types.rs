use serde::{Deserialize, Serialize};

use crate::road_class::DEFAULT_SPEED_LIMIT;

/// Road name used when no road could be identified
pub(crate) const UNIDENTIFIED_ROAD: &str = "unidentified";

/// Road details resolved for a coordinate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadInfo {
    pub road_name: String,
    /// Speed limit in km/h
    pub speed_limit: u32,
    pub found: bool,
    /// OSM `highway` class, e.g. `primary` or `residential`
    pub road_class: String,
    pub road_class_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Why the lookup failed, when this is a substitute result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RoadInfo {
    /// Conservative placeholder for coordinates that could not be resolved
    pub fn unidentified(error: Option<String>) -> Self {
        Self {
            road_name: UNIDENTIFIED_ROAD.to_string(),
            speed_limit: DEFAULT_SPEED_LIMIT,
            found: false,
            road_class: "unknown".to_string(),
            road_class_description: "Unknown".to_string(),
            city: None,
            state: None,
            country: None,
            error,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NominatimResponse {
    /// OSM tag value of the matched object; the highway class when it is a road
    #[serde(rename = "type")]
    pub(crate) osm_type: Option<String>,
    pub(crate) address: Option<NominatimAddress>,
    pub(crate) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NominatimAddress {
    pub(crate) road: Option<String>,
    pub(crate) highway: Option<String>,
    pub(crate) suburb: Option<String>,
    pub(crate) neighbourhood: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) town: Option<String>,
    pub(crate) village: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unidentified_defaults() {
        let info = RoadInfo::unidentified(Some("timeout".to_string()));
        assert_eq!(info.speed_limit, 50);
        assert_eq!(info.road_name, "unidentified");
        assert!(!info.found);
        assert_eq!(info.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_optional_fields_are_skipped() {
        let info = RoadInfo::unidentified(None);
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("error"));
        assert!(!json.contains("city"));
        assert!(json.contains("\"speed_limit\":50"));
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "place_id": 123,
            "category": "highway",
            "type": "primary",
            "address": {
                "road": "Avenida Paulista",
                "suburb": "Bela Vista",
                "city": "São Paulo",
                "state": "São Paulo",
                "country": "Brasil",
                "country_code": "br"
            }
        }"#;

        let response: NominatimResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.osm_type.as_deref(), Some("primary"));
        let address = response.address.unwrap();
        assert_eq!(address.road.as_deref(), Some("Avenida Paulista"));
        assert_eq!(address.city.as_deref(), Some("São Paulo"));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_error_response_deserialization() {
        let json = r#"{"error": "Unable to geocode"}"#;
        let response: NominatimResponse = serde_json::from_str(json).unwrap();
        assert!(response.address.is_none());
        assert_eq!(response.error.as_deref(), Some("Unable to geocode"));
    }
}
