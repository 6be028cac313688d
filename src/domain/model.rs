use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::utils::error::Result;

fn decode(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// What a transport hands back for one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub body: String,
    /// Every `Content-Type` header value, in the order received.
    pub content_types: Vec<String>,
}

impl FetchedResponse {
    pub fn new(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_types: vec![content_type.into()],
        }
    }

    pub fn declares_json(&self) -> bool {
        self.content_types
            .iter()
            .any(|ct| ct.to_ascii_lowercase().contains("json"))
    }
}

/// Response body as handed to a service parser.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Decodes JSON-declared, non-empty bodies; anything else (including
    /// malformed JSON) stays text.
    pub fn from_fetched(response: FetchedResponse) -> Self {
        if response.body.is_empty() || !response.declares_json() {
            return ResponseBody::Text(response.body);
        }

        match decode(&response.body) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => {
                tracing::debug!("Declared JSON body failed to decode, using raw text: {}", e);
                ResponseBody::Text(response.body)
            }
        }
    }

    /// JSON view of the body, decoding text on demand.
    pub fn json(&self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value.clone()),
            ResponseBody::Text(text) => decode(text).ok(),
        }
    }

    pub fn text(&self) -> String {
        match self {
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text.clone(),
        }
    }
}

/// Result of running a service parser.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceOutput {
    Count(u64),
    /// Body passed through untouched (diagnostic service only).
    Raw(ResponseBody),
}

impl ServiceOutput {
    pub fn count(&self) -> u64 {
        match self {
            ServiceOutput::Count(n) => *n,
            ServiceOutput::Raw(ResponseBody::Json(value)) => value.as_u64().unwrap_or(0),
            ServiceOutput::Raw(ResponseBody::Text(text)) => text.trim().parse().unwrap_or(0),
        }
    }
}

/// Per-service breakdown plus grand total for one target URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShareReport {
    #[serde(flatten)]
    pub counts: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, String>,
    pub total: u64,
}

impl ShareReport {
    pub fn record(&mut self, service: &str, count: u64) {
        self.counts.insert(service.to_string(), count);
        // 第三方回傳的數字不可信，總數封頂在 u64::MAX
        self.total = self.total.saturating_add(count);
    }

    pub fn record_failure(&mut self, service: &str, message: String) {
        self.failures.insert(service.to_string(), message);
    }

    pub fn get(&self, service: &str) -> Option<u64> {
        self.counts.get(service).copied()
    }
}
