//! In-memory sink for testing and dry runs

use crate::telemetry::error::{SinkError, SinkResult};
use crate::telemetry::records::{AlertReceipt, AlertRecord, StateRecord};
use crate::telemetry::sink::TelemetrySink;
use rand::Rng;

/// Records everything published to it
#[derive(Debug, Default)]
pub struct MockSink {
    states: Vec<StateRecord>,
    alerts: Vec<AlertRecord>,
    latest_alert: Option<AlertRecord>,
    disconnected: bool,
    error_probability: f64,
    failures: u32,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail publishes with the given probability (0.0 to 1.0)
    pub fn simulate_errors(&mut self, probability: f64) {
        self.error_probability = probability.clamp(0.0, 1.0);
    }

    /// Simulate losing the link to the store
    pub fn disconnect(&mut self) {
        self.disconnected = true;
    }

    pub fn reconnect(&mut self) {
        self.disconnected = false;
    }

    /// State records in publish order
    pub fn published_states(&self) -> &[StateRecord] {
        &self.states
    }

    /// Alert log in publish order
    pub fn published_alerts(&self) -> &[AlertRecord] {
        &self.alerts
    }

    pub fn latest_alert(&self) -> Option<&AlertRecord> {
        self.latest_alert.as_ref()
    }

    /// Number of rejected publishes
    pub fn failure_count(&self) -> u32 {
        self.failures
    }

    fn check_link(&mut self) -> SinkResult<()> {
        if self.disconnected {
            self.failures += 1;
            return Err(SinkError::Disconnected {
                sink: self.name().to_string(),
            });
        }
        if self.error_probability > 0.0 && rand::thread_rng().gen::<f64>() < self.error_probability {
            self.failures += 1;
            return Err(SinkError::Transport {
                details: "simulated publish failure".to_string(),
            });
        }
        Ok(())
    }
}

impl TelemetrySink for MockSink {
    fn publish_state(&mut self, record: &StateRecord) -> SinkResult<u16> {
        self.check_link()?;
        self.states.push(record.clone());
        Ok(200)
    }

    fn publish_alert(&mut self, alert: &AlertRecord) -> SinkResult<AlertReceipt> {
        self.check_link()?;
        self.alerts.push(alert.clone());
        self.latest_alert = Some(alert.clone());
        Ok(AlertReceipt {
            log_status: 200,
            latest_status: 200,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::records::SignalQuality;

    fn signal() -> SignalQuality {
        SignalQuality { rssi: -62, snr: 9.1 }
    }

    #[test]
    fn test_records_states_in_order() {
        let mut sink = MockSink::new();
        for i in 0..3 {
            let record = StateRecord::new("BOAT_001", Some(crate::core::Position::new(i as f64, 0.0)), signal());
            assert_eq!(sink.publish_state(&record).unwrap(), 200);
        }
        let latitudes: Vec<_> = sink.published_states().iter().map(|r| r.latitude).collect();
        assert_eq!(latitudes, vec![Some(0.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_alert_updates_log_and_latest() {
        let mut sink = MockSink::new();
        let first = AlertRecord::emergency("BOAT_001", None, signal(), 1);
        let second = AlertRecord::emergency("BOAT_001", None, signal(), 2);
        sink.publish_alert(&first).unwrap();
        sink.publish_alert(&second).unwrap();

        assert_eq!(sink.published_alerts().len(), 2);
        assert_eq!(sink.latest_alert().unwrap().id, "2");
    }

    #[test]
    fn test_disconnected_sink_fails() {
        let mut sink = MockSink::new();
        sink.disconnect();
        let record = StateRecord::new("BOAT_001", None, signal());
        assert!(matches!(sink.publish_state(&record), Err(SinkError::Disconnected { .. })));
        assert_eq!(sink.failure_count(), 1);
        assert!(sink.published_states().is_empty());

        sink.reconnect();
        assert!(sink.publish_state(&record).is_ok());
    }

    #[test]
    fn test_error_simulation() {
        let mut sink = MockSink::new();
        sink.simulate_errors(1.0);
        let record = StateRecord::new("BOAT_001", None, signal());
        assert!(sink.publish_state(&record).is_err());
        assert!(sink.failure_count() > 0);
    }
}
