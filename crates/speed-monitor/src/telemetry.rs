//! Telemetry validation and overspeed evaluation

use crate::error::AppError;
use chrono::{DateTime, Utc};
use nominatim_client::RoadInfo;
use serde::{Deserialize, Serialize};

const MAX_SPEED: f64 = 300.0;

/// Raw telemetry body as posted by a vehicle unit; every field is checked by
/// [`TelemetryPayload::validate`]
#[derive(Debug, Default, Deserialize)]
pub struct TelemetryPayload {
    /// Unit identifier, accepted as either string or number
    pub vehicle_id: Option<serde_json::Value>,
    /// Device timestamp, accepted as either epoch number or string
    pub timestamp: Option<serde_json::Value>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// km/h
    pub speed: Option<f64>,
}

/// Telemetry that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
}

impl TelemetryPayload {
    pub fn validate(self) -> Result<Telemetry, AppError> {
        let vehicle_id = match self.vehicle_id {
            Some(serde_json::Value::String(id)) if !id.trim().is_empty() => id,
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => return Err(missing("vehicle_id")),
        };

        match self.timestamp {
            None | Some(serde_json::Value::Null) => return Err(missing("timestamp")),
            Some(serde_json::Value::String(ref s)) if s.is_empty() => {
                return Err(missing("timestamp"))
            }
            Some(_) => {}
        }

        let latitude = self.lat.ok_or_else(|| missing("lat"))?;
        let longitude = self.lon.ok_or_else(|| missing("lon"))?;
        let speed = self.speed.ok_or_else(|| missing("speed"))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::BadRequest(
                "Latitude must be between -90 and 90".to_string(),
            ));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::BadRequest(
                "Longitude must be between -180 and 180".to_string(),
            ));
        }

        if !(0.0..=MAX_SPEED).contains(&speed) {
            return Err(AppError::BadRequest(format!(
                "Speed must be between 0 and {MAX_SPEED} km/h"
            )));
        }

        Ok(Telemetry {
            vehicle_id,
            latitude,
            longitude,
            speed,
        })
    }
}

fn missing(field: &str) -> AppError {
    AppError::BadRequest(format!("Field {field} is required"))
}

/// Response returned to the vehicle unit
#[derive(Debug, Serialize)]
pub struct SpeedReport {
    pub speed_limit: u32,
    pub road: String,
    pub alert: bool,
    pub message: String,
    pub source: &'static str,
    pub updated_at: DateTime<Utc>,
}

/// Compare reported speed against the road's limit
pub fn evaluate(telemetry: &Telemetry, road: &RoadInfo) -> SpeedReport {
    let limit = f64::from(road.speed_limit);
    let alert = telemetry.speed > limit;

    let message = if alert {
        format!(
            "Vehicle over the limit by +{} km/h",
            telemetry.speed - limit
        )
    } else {
        "Speed within limit".to_string()
    };

    SpeedReport {
        speed_limit: road.speed_limit,
        road: road.road_name.clone(),
        alert,
        message,
        source: "OSM",
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> TelemetryPayload {
        serde_json::from_value(json!({
            "vehicle_id": "ESP32-001",
            "timestamp": 1_700_000_000,
            "lat": -23.55891,
            "lon": -46.66211,
            "speed": 72
        }))
        .unwrap()
    }

    fn road(limit: u32) -> RoadInfo {
        RoadInfo {
            road_name: "Av. Paulista".to_string(),
            speed_limit: limit,
            ..RoadInfo::unidentified(None)
        }
    }

    fn error_message(result: Result<Telemetry, AppError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_valid_payload() {
        let telemetry = payload().validate().unwrap();
        assert_eq!(telemetry.vehicle_id, "ESP32-001");
        assert_eq!(telemetry.speed, 72.0);
        assert_eq!(telemetry.latitude, -23.55891);
    }

    #[test]
    fn test_numeric_vehicle_id_accepted() {
        let mut p = payload();
        p.vehicle_id = Some(json!(1017));
        assert_eq!(p.validate().unwrap().vehicle_id, "1017");
    }

    #[test]
    fn test_blank_or_structured_vehicle_id_rejected() {
        for id in [json!("  "), json!(true), json!({ "id": 1 }), json!(null)] {
            let mut p = payload();
            p.vehicle_id = Some(id);
            assert_eq!(error_message(p.validate()), "Field vehicle_id is required");
        }
    }

    #[test]
    fn test_string_timestamp_accepted() {
        let mut p = payload();
        p.timestamp = Some(json!("2024-05-01T12:00:00Z"));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            error_message(TelemetryPayload::default().validate()),
            "Field vehicle_id is required"
        );

        let mut p = payload();
        p.timestamp = None;
        assert_eq!(error_message(p.validate()), "Field timestamp is required");

        let mut p = payload();
        p.lon = None;
        assert_eq!(error_message(p.validate()), "Field lon is required");

        let mut p = payload();
        p.speed = None;
        assert_eq!(error_message(p.validate()), "Field speed is required");
    }

    #[test]
    fn test_out_of_range() {
        let mut p = payload();
        p.lat = Some(90.5);
        assert!(error_message(p.validate()).contains("Latitude"));

        let mut p = payload();
        p.lon = Some(-181.0);
        assert!(error_message(p.validate()).contains("Longitude"));

        let mut p = payload();
        p.speed = Some(301.0);
        assert!(error_message(p.validate()).contains("Speed"));

        let mut p = payload();
        p.speed = Some(-1.0);
        assert!(error_message(p.validate()).contains("Speed"));
    }

    #[test]
    fn test_evaluate_over_limit() {
        let telemetry = payload().validate().unwrap();
        let report = evaluate(&telemetry, &road(60));
        assert!(report.alert);
        assert_eq!(report.message, "Vehicle over the limit by +12 km/h");
        assert_eq!(report.speed_limit, 60);
        assert_eq!(report.road, "Av. Paulista");
        assert_eq!(report.source, "OSM");
    }

    #[test]
    fn test_evaluate_at_limit() {
        let mut telemetry = payload().validate().unwrap();
        telemetry.speed = 60.0;
        let report = evaluate(&telemetry, &road(60));
        assert!(!report.alert);
        assert_eq!(report.message, "Speed within limit");
    }

    #[test]
    fn test_evaluate_fractional_excess() {
        let mut telemetry = payload().validate().unwrap();
        telemetry.speed = 52.5;
        let report = evaluate(&telemetry, &road(50));
        assert_eq!(report.message, "Vehicle over the limit by +2.5 km/h");
    }
}
