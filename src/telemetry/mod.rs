//! Telemetry publication
//!
//! Position updates and alerts leave the simulator through a
//! [`TelemetrySink`]. The REST sink talks to a JSON key-value store over
//! HTTP; the mock sink keeps everything in memory.

pub mod error;
pub mod mock;
pub mod records;
pub mod rest;
pub mod sink;

pub use error::{SinkError, SinkResult};
pub use mock::MockSink;
pub use records::{AlertKind, AlertReceipt, AlertRecord, GpsStatus, ServerTimestamp, SignalQuality, StateRecord};
pub use rest::RestSink;
pub use sink::TelemetrySink;
