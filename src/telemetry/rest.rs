//! REST sink for a JSON key-value store
//!
//! Records are written as `<path>.json` documents: the entity state with PUT
//! under `{base}/{collection}/{entity}.json`, alerts with a POST to
//! `{base}/alerts.json` followed by a PUT to `{base}/alerts/latest.json`.
//! A static auth token, when configured, travels as the `auth` query parameter.
//! A rejected state write is an error; alert writes report their raw statuses
//! in the [`AlertReceipt`].

use crate::telemetry::error::{SinkError, SinkResult};
use crate::telemetry::records::{AlertReceipt, AlertRecord, StateRecord};
use crate::telemetry::sink::TelemetrySink;
use crate::utils::config::SinkConfig;
use log::debug;
use reqwest::blocking::Client;
use reqwest::{Method, Url};
use serde::Serialize;
use std::time::Duration;

/// Blocking HTTP sink
pub struct RestSink {
    client: Client,
    base_url: Url,
    collection: String,
    entity_id: String,
    auth: Option<String>,
}

impl RestSink {
    /// Create a sink from configuration
    pub fn new(config: &SinkConfig) -> SinkResult<Self> {
        let raw = config.database_url.trim();
        let base_url = Url::parse(raw).map_err(|e| SinkError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SinkError::InvalidUrl {
                url: raw.to_string(),
                reason: "url cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url,
            collection: config.collection.clone(),
            entity_id: config.effective_entity_id().to_string(),
            auth: config.effective_auth().map(str::to_string),
        })
    }

    /// Location of this entity's state record
    pub fn state_url(&self) -> SinkResult<Url> {
        let document = format!("{}.json", self.entity_id);
        self.endpoint(&[self.collection.as_str(), document.as_str()])
    }

    /// Location of the append-only alert log
    pub fn alert_log_url(&self) -> SinkResult<Url> {
        self.endpoint(&["alerts.json"])
    }

    /// Location of the latest alert record
    pub fn latest_alert_url(&self) -> SinkResult<Url> {
        self.endpoint(&["alerts", "latest.json"])
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    fn endpoint(&self, segments: &[&str]) -> SinkResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SinkError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "url cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);

        if let Some(auth) = &self.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }
        Ok(url)
    }

    /// Send `body` and return the response status, whatever it is
    fn send_raw<T: Serialize>(&self, method: Method, url: Url, body: &T) -> SinkResult<u16> {
        debug!("{} {}", method, url.path());
        let response = self.client.request(method, url).json(body).send()?;
        Ok(response.status().as_u16())
    }

    fn send_json<T: Serialize>(&self, method: Method, url: Url, body: &T) -> SinkResult<u16> {
        let status = self.send_raw(method, url, body)?;
        if !(200..300).contains(&status) {
            return Err(SinkError::Rejected { status });
        }
        Ok(status)
    }
}

impl TelemetrySink for RestSink {
    fn publish_state(&mut self, record: &StateRecord) -> SinkResult<u16> {
        let url = self.state_url()?;
        self.send_json(Method::PUT, url, record)
    }

    /// Append to the log, then overwrite the latest alert. A rejected
    /// append does not skip the overwrite.
    fn publish_alert(&mut self, alert: &AlertRecord) -> SinkResult<AlertReceipt> {
        let log_status = self.send_raw(Method::POST, self.alert_log_url()?, alert)?;
        let latest_status = self.send_raw(Method::PUT, self.latest_alert_url()?, alert)?;
        Ok(AlertReceipt {
            log_status,
            latest_status,
        })
    }

    fn name(&self) -> &str {
        "rest"
    }
}
