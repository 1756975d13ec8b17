//! Records published to the remote store
//!
//! Field names and value shapes follow the receiver's schema: camelCase keys,
//! `{".sv": "timestamp"}` placeholders resolved server-side, and coordinates
//! rounded to six decimals.

use crate::core::Position;
use rand::Rng;
use serde::Serialize;

/// Server-side timestamp placeholder, serialized as `{".sv": "timestamp"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerTimestamp {
    #[serde(rename = ".sv")]
    sv: &'static str,
}

impl Default for ServerTimestamp {
    fn default() -> Self {
        Self { sv: "timestamp" }
    }
}

/// GPS fix state reported with each position update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GpsStatus {
    GpsFix,
    NoGpsFix,
}

/// Alert message tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    Emergency,
}

/// Mocked radio link metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalQuality {
    /// Received signal strength (dBm), integer in [-70, -60]
    pub rssi: i32,
    /// Signal-to-noise ratio (dB), one decimal in [5, 10]
    pub snr: f64,
}

impl SignalQuality {
    /// Draw plausible link metrics
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rssi = -70 + (rng.gen::<f64>() * 10.0).round() as i32;
        let snr = (rng.gen_range(5.0..10.0_f64) * 10.0).round() / 10.0;
        Self { rssi, snr }
    }
}

/// Round a coordinate to six decimals (~0.1 m)
pub fn round_coordinate(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Per-entity "current state" record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRecord {
    #[serde(rename = "boatId")]
    pub entity_id: String,
    pub timestamp: ServerTimestamp,
    #[serde(rename = "lat", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(rename = "lng", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub status: GpsStatus,
    pub rssi: i32,
    pub snr: f64,
    pub last_update: ServerTimestamp,
}

impl StateRecord {
    /// Build a record; a missing position reports `NO_GPS_FIX`
    pub fn new(entity_id: &str, position: Option<Position>, signal: SignalQuality) -> Self {
        let status = if position.is_some() {
            GpsStatus::GpsFix
        } else {
            GpsStatus::NoGpsFix
        };

        Self {
            entity_id: entity_id.to_string(),
            timestamp: ServerTimestamp::default(),
            latitude: position.map(|p| round_coordinate(p.latitude)),
            longitude: position.map(|p| round_coordinate(p.longitude)),
            status,
            rssi: signal.rssi,
            snr: signal.snr,
            last_update: ServerTimestamp::default(),
        }
    }
}

/// Entry of the append-only alert log, also written as the latest alert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    pub id: String,
    #[serde(rename = "boatId")]
    pub entity_id: String,
    pub message: AlertKind,
    pub timestamp: ServerTimestamp,
    pub rssi: i32,
    pub snr: f64,
    #[serde(rename = "lat", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(rename = "lng", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl AlertRecord {
    /// Emergency alert; `now_ms` (Unix milliseconds) doubles as the alert id
    pub fn emergency(
        entity_id: &str,
        position: Option<Position>,
        signal: SignalQuality,
        now_ms: u64,
    ) -> Self {
        Self {
            id: now_ms.to_string(),
            entity_id: entity_id.to_string(),
            message: AlertKind::Emergency,
            timestamp: ServerTimestamp::default(),
            rssi: signal.rssi,
            snr: signal.snr,
            latitude: position.map(|p| round_coordinate(p.latitude)),
            longitude: position.map(|p| round_coordinate(p.longitude)),
        }
    }

    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Response codes of the two writes made for an alert, accepted or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertReceipt {
    /// Append to the alert log (POST)
    pub log_status: u16,
    /// Overwrite of the latest alert (PUT)
    pub latest_status: u16,
}

impl AlertReceipt {
    /// Both writes answered with a 2xx status
    pub fn is_accepted(&self) -> bool {
        (200..300).contains(&self.log_status) && (200..300).contains(&self.latest_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn signal() -> SignalQuality {
        SignalQuality { rssi: -65, snr: 7.5 }
    }

    #[test]
    fn test_state_record_with_fix() {
        let record = StateRecord::new("BOAT_007", Some(Position::new(14.59951234, 120.98421987)), signal());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "boatId": "BOAT_007",
                "timestamp": { ".sv": "timestamp" },
                "lat": 14.599512,
                "lng": 120.98422,
                "status": "GPS_FIX",
                "rssi": -65,
                "snr": 7.5,
                "lastUpdate": { ".sv": "timestamp" }
            })
        );
    }

    #[test]
    fn test_state_record_without_fix_omits_coordinates() {
        let record = StateRecord::new("BOAT_001", None, signal());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "NO_GPS_FIX");
        assert!(value.get("lat").is_none());
        assert!(value.get("lng").is_none());
    }

    #[test]
    fn test_emergency_alert_shape() {
        let alert = AlertRecord::emergency("BOAT_001", Some(Position::new(1.0, 2.0)), signal(), 1_700_000_000_123);
        assert!(alert.has_location());
        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(value["id"], "1700000000123");
        assert_eq!(value["message"], "EMERGENCY");
        assert_eq!(value["boatId"], "BOAT_001");
        assert_eq!(value["timestamp"], json!({ ".sv": "timestamp" }));
        assert_eq!(value["lat"], 1.0);
        assert_eq!(value["lng"], 2.0);

        let alert = AlertRecord::emergency("BOAT_001", None, signal(), 1);
        assert!(!alert.has_location());
        let value = serde_json::to_value(&alert).unwrap();
        assert!(value.get("lat").is_none());
    }

    #[test]
    fn test_alert_receipt_acceptance() {
        let accepted = AlertReceipt { log_status: 200, latest_status: 204 };
        assert!(accepted.is_accepted());

        let rejected_log = AlertReceipt { log_status: 401, latest_status: 200 };
        assert!(!rejected_log.is_accepted());

        let rejected_latest = AlertReceipt { log_status: 200, latest_status: 500 };
        assert!(!rejected_latest.is_accepted());
    }

    #[test]
    fn test_signal_quality_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let sample = SignalQuality::sample(&mut rng);
            assert!((-70..=-60).contains(&sample.rssi));
            assert!(sample.snr >= 5.0 && sample.snr <= 10.0);
            assert!(((sample.snr * 10.0).round() - sample.snr * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_round_coordinate() {
        assert_eq!(round_coordinate(0.0000004), 0.0);
        assert_eq!(round_coordinate(-33.86881234), -33.868812);
    }
}
