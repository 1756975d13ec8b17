//! Telemetry sink trait

use crate::telemetry::error::SinkResult;
use crate::telemetry::records::{AlertReceipt, AlertRecord, StateRecord};

/// Destination for position updates and alerts.
///
/// Publishing is fire-and-forget from the simulation's point of view: callers
/// log failures but never let them alter simulation state.
pub trait TelemetrySink {
    /// Overwrite the entity's current state record.
    /// Returns the response status code.
    fn publish_state(&mut self, record: &StateRecord) -> SinkResult<u16>;

    /// Append to the alert log and overwrite the latest alert.
    /// Both writes are attempted; the receipt holds both statuses.
    fn publish_alert(&mut self, alert: &AlertRecord) -> SinkResult<AlertReceipt>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Box<T> {
    fn publish_state(&mut self, record: &StateRecord) -> SinkResult<u16> {
        (**self).publish_state(record)
    }

    fn publish_alert(&mut self, alert: &AlertRecord) -> SinkResult<AlertReceipt> {
        (**self).publish_alert(alert)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
