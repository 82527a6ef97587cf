//! HTTP client for the query gateway.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GatewaySettings;
use crate::domain::{BugRecord, DateRange, SourceSystem};

use super::types::{SummaryCounts, TimeSeriesPoint};
use super::GatewayError;

/// Client for the query gateway.
///
/// All calls are blocking; the GUI drives this from the fetch worker thread,
/// never from the UI thread. Timeouts are enforced at the agent level so a
/// hung gateway turns into an error instead of a stuck view.
#[derive(Clone)]
pub struct GatewayClient {
    base_url: String,
    agent: ureq::Agent,
}

impl GatewayClient {
    pub fn new(settings: &GatewaySettings) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(settings.connect_timeout_secs))
            .timeout_read(Duration::from_secs(settings.read_timeout_secs))
            .build();

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the gateway is reachable. Any 2xx response counts as up.
    pub fn health_check(&self) -> Result<(), GatewayError> {
        let url = format!("{}/health", self.base_url);
        self.agent.get(&url).call().map_err(GatewayError::from)?;
        Ok(())
    }

    /// `query_type=summary`: aggregate counts, optionally scoped to one
    /// source and/or a date range.
    pub fn summary(
        &self,
        source: Option<SourceSystem>,
        range: Option<&DateRange>,
    ) -> Result<SummaryCounts, GatewayError> {
        let mut request = self.agent.get(&self.base_url).query("query_type", "summary");
        if let Some(source) = source {
            request = request.query("source_system", source.as_str());
        }
        request = with_range(request, range);

        let value = call_json(request)?;
        let data = normalize_envelope(value)?;
        serde_json::from_value(data)
            .map_err(|e| GatewayError::BadResponse(format!("summary decode failed: {}", e)))
    }

    /// `query_type=by_source`: all records for one source, optionally
    /// bounded by a date range.
    ///
    /// Items are decoded one at a time so a single malformed record is
    /// skipped with a warning rather than rejecting the whole payload.
    pub fn records_by_source(
        &self,
        source: SourceSystem,
        range: Option<&DateRange>,
    ) -> Result<Vec<BugRecord>, GatewayError> {
        let mut request = self
            .agent
            .get(&self.base_url)
            .query("query_type", "by_source")
            .query("source_system", source.as_str());
        request = with_range(request, range);

        let value = call_json(request)?;
        let data = normalize_envelope(value)?;
        let items = extract_items(data)?;

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<BugRecord>(item) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping malformed {} record: {}", source.as_str(), e),
            }
        }
        debug!("Fetched {} {} records", records.len(), source.as_str());
        Ok(records)
    }

    /// `query_type=time_series`: one point per day for the last `days` days.
    pub fn time_series(
        &self,
        days: u32,
        source: Option<SourceSystem>,
    ) -> Result<Vec<TimeSeriesPoint>, GatewayError> {
        let mut request = self
            .agent
            .get(&self.base_url)
            .query("query_type", "time_series")
            .query("days", &days.to_string());
        if let Some(source) = source {
            request = request.query("source_system", source.as_str());
        }

        let value = call_json(request)?;
        let data = normalize_envelope(value)?;
        // Either a bare array or wrapped in {"items": [...]}.
        let points = match data {
            Value::Array(_) => data,
            Value::Object(ref map) if map.contains_key("items") => map["items"].clone(),
            other => other,
        };
        serde_json::from_value(points)
            .map_err(|e| GatewayError::BadResponse(format!("time_series decode failed: {}", e)))
    }

    /// POST `/link-bugs`: declare that an old and a new ticket identifier
    /// refer to the same issue.
    ///
    /// Validation happens here, before any network call: both identifiers
    /// must be non-empty. The call itself only asserts a relationship, so
    /// retrying after a failure is safe.
    pub fn link_bugs(&self, old_ticket_id: &str, new_ticket_id: &str) -> Result<(), GatewayError> {
        let old_ticket_id = old_ticket_id.trim();
        let new_ticket_id = new_ticket_id.trim();
        if old_ticket_id.is_empty() {
            return Err(GatewayError::Invalid("old ticket id is empty".to_string()));
        }
        if new_ticket_id.is_empty() {
            return Err(GatewayError::Invalid("new ticket id is empty".to_string()));
        }

        let url = format!("{}/link-bugs", self.base_url);
        let response = self
            .agent
            .post(&url)
            .send_json(serde_json::json!({
                "action": "link_bugs",
                "old_ticket_id": old_ticket_id,
                "new_ticket_id": new_ticket_id,
            }))
            .map_err(GatewayError::from)?;

        let value: Value = response
            .into_json()
            .map_err(|e| GatewayError::BadResponse(format!("link response unreadable: {}", e)))?;
        normalize_envelope(value)?;
        Ok(())
    }
}

fn with_range(request: ureq::Request, range: Option<&DateRange>) -> ureq::Request {
    match range {
        Some(range) => request
            .query("start_date", &range.start_param())
            .query("end_date", &range.end_param()),
        None => request,
    }
}

fn call_json(request: ureq::Request) -> Result<Value, GatewayError> {
    let response = request.call().map_err(GatewayError::from)?;
    response
        .into_json()
        .map_err(|e| GatewayError::BadResponse(format!("response is not JSON: {}", e)))
}

/// Collapse the two response shapes the gateway has historically used:
/// `{success, data, error, message}` envelopes and bare top-level payloads.
/// An envelope with `success: false` becomes [`GatewayError::Rejected`].
pub(super) fn normalize_envelope(value: Value) -> Result<Value, GatewayError> {
    match value {
        Value::Object(mut map) if map.contains_key("success") => {
            let success = map["success"].as_bool().unwrap_or(false);
            if !success {
                let message = map
                    .get("error")
                    .or_else(|| map.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("gateway reported failure")
                    .to_string();
                return Err(GatewayError::Rejected(message));
            }
            match map.remove("data") {
                Some(data) if !data.is_null() => Ok(data),
                // Success envelope with no data field: the payload fields
                // sit alongside "success" at the top level.
                _ => Ok(Value::Object(map)),
            }
        }
        other => Ok(other),
    }
}

/// Pull the record array out of a by_source payload: `{"items": [...]}`
/// or a bare array.
fn extract_items(data: Value) -> Result<Vec<Value>, GatewayError> {
    match data {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(GatewayError::BadResponse(format!(
                "items field is not an array: {}",
                other
            ))),
            None => Err(GatewayError::BadResponse(
                "by_source payload has no items array".to_string(),
            )),
        },
        other => Err(GatewayError::BadResponse(format!(
            "unexpected by_source payload: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_success_unwraps_data() {
        let value = serde_json::json!({"success": true, "data": {"total": 3}});
        let data = normalize_envelope(value).unwrap();
        assert_eq!(data["total"], 3);
    }

    #[test]
    fn envelope_success_without_data_keeps_siblings() {
        let value = serde_json::json!({"success": true, "items": [1, 2]});
        let data = normalize_envelope(value).unwrap();
        assert_eq!(data["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn envelope_failure_surfaces_message() {
        let value = serde_json::json!({"success": false, "error": "table scan failed"});
        match normalize_envelope(value) {
            Err(GatewayError::Rejected(msg)) => assert_eq!(msg, "table scan failed"),
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn bare_payload_passes_through() {
        let value = serde_json::json!([{"date": "2025-06-01", "count": 0}]);
        let data = normalize_envelope(value).unwrap();
        assert!(data.is_array());
    }

    #[test]
    fn extract_items_handles_both_shapes() {
        let wrapped = serde_json::json!({"items": [{"PK": "ZD-1"}]});
        assert_eq!(extract_items(wrapped).unwrap().len(), 1);

        let bare = serde_json::json!([{"PK": "ZD-1"}, {"PK": "ZD-2"}]);
        assert_eq!(extract_items(bare).unwrap().len(), 2);

        let wrong = serde_json::json!({"records": []});
        assert!(extract_items(wrong).is_err());
    }

    #[test]
    fn link_rejects_blank_ids_before_any_call() {
        // Points at a port nothing listens on: if validation did not happen
        // first, these would fail with a transport error instead.
        let client = GatewayClient::new(&crate::config::GatewaySettings {
            base_url: "http://127.0.0.1:1".to_string(),
            connect_timeout_secs: 1,
            read_timeout_secs: 1,
        });
        assert!(matches!(
            client.link_bugs("ZD-1", "   "),
            Err(GatewayError::Invalid(_))
        ));
        assert!(matches!(
            client.link_bugs("", "SC-2"),
            Err(GatewayError::Invalid(_))
        ));
    }
}
