//! In-memory transport for unit tests

use crate::error::{Error, Result};
use crate::http::Transport;
use crate::types::JsonValue;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

/// Serves `total` numbered records over cursor pagination
///
/// Cursors are `o<offset>`; records are `{"id": "W<n>", "n": n}` with `n`
/// starting at 1.
pub(crate) struct StubTransport {
    total: usize,
    fail_on_request: Option<usize>,
    with_abstracts: bool,
    requests: Mutex<Vec<String>>,
}

impl StubTransport {
    pub(crate) fn with_records(total: usize) -> Self {
        Self {
            total,
            fail_on_request: None,
            with_abstracts: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer the `n`th request (1-based) with a 500
    pub(crate) fn failing_on(mut self, n: usize) -> Self {
        self.fail_on_request = Some(n);
        self
    }

    /// Give every record an inverted abstract index
    pub(crate) fn abstracts(mut self) -> Self {
        self.with_abstracts = true;
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn record(&self, n: usize) -> JsonValue {
        let mut record = json!({"id": format!("W{n}"), "n": n});
        if self.with_abstracts {
            record["abstract_inverted_index"] = json!({"record": [1], "Abstract": [0], "number": [2]});
        }
        record
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get_json(&self, url: &str) -> Result<JsonValue> {
        let request_number = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(url.to_string());
            requests.len()
        };
        if self.fail_on_request == Some(request_number) {
            return Err(Error::http_status(500, "Internal Server Error", "boom"));
        }

        let parsed = url::Url::parse(url)?;
        let mut per_page = 25usize;
        let mut offset = 0usize;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "per_page" => per_page = value.parse().unwrap(),
                "cursor" if value != "*" => {
                    offset = value.trim_start_matches('o').parse().unwrap();
                }
                _ => {}
            }
        }

        let end = (offset + per_page).min(self.total);
        let results: Vec<JsonValue> = (offset..end).map(|i| self.record(i + 1)).collect();
        let next_cursor = (end < self.total).then(|| format!("o{end}"));

        Ok(json!({
            "meta": {
                "count": self.total,
                "db_response_time_ms": 3,
                "page": null,
                "per_page": per_page,
                "next_cursor": next_cursor,
                "groups_count": null
            },
            "results": results,
            "group_by": []
        }))
    }
}
