//! Core data models for the intent router

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::RouterError;

//
// ================= Intent =================
//

/// A backend capability a message can be routed to.
///
/// Wire labels match the downstream agent services: `vols`, `stock`,
/// `rappels`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Intent {
    #[serde(rename = "vols")]
    FlightSearch,
    #[serde(rename = "stock")]
    StockQuery,
    #[serde(rename = "rappels")]
    ReminderRun,
}

impl Intent {
    pub const ALL: [Intent; 3] = [
        Intent::FlightSearch,
        Intent::StockQuery,
        Intent::ReminderRun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::FlightSearch => "vols",
            Intent::StockQuery => "stock",
            Intent::ReminderRun => "rappels",
        }
    }

    /// Parse a classifier label. `"none"` is not an intent; callers handle it
    /// before reaching here.
    pub fn from_label(label: &str) -> Option<Intent> {
        match label {
            "vols" => Some(Intent::FlightSearch),
            "stock" => Some(Intent::StockQuery),
            "rappels" => Some(Intent::ReminderRun),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ================= Routing Decision =================
//

/// The classifier's structured output: which agent (if any) and the
/// parameters it extracted. Produced once per request, immutable after.
///
/// Invariant: `intent == None` implies `parameters` is empty and no dispatch
/// occurs.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    pub intent: Option<Intent>,
    pub parameters: Map<String, Value>,
}

impl RoutingDecision {
    pub fn unmatched() -> Self {
        Self {
            intent: None,
            parameters: Map::new(),
        }
    }
}

//
// ================= Endpoint Registry Entries =================
//

/// How the outbound body for an endpoint is shaped.
///
/// An explicit per-descriptor policy: adding a backend with a different
/// contract is a data change, not a code change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
    /// Forward the classifier's extracted parameters verbatim.
    Passthrough,
    /// Send `{"input": <raw user message>}`, ignoring extracted parameters.
    WrapAsInput,
}

/// One registry entry: where an intent dispatches to and how its payload is
/// shaped. Read-only after startup.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    pub intent: Intent,
    pub address: String,
    pub payload_mode: PayloadMode,
}

//
// ================= Dispatch Outcome =================
//

/// Result of one downstream call. Created per request by the dispatcher and
/// consumed immediately by the envelope builder, never persisted.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub called: Intent,
    pub body: Option<Value>,
    pub error: Option<RouterError>,
}

impl DispatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

//
// ================= Response Envelope =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Unknown,
    Error,
}

/// The single caller-facing result. The only object crossing the system
/// boundary outward; one per request, no partial or streamed responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: EnvelopeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub called_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseEnvelope {
    pub fn success(intent: Intent, body: Value) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            called_agent: Some(intent.as_str().to_string()),
            response: Some(body),
            message: None,
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Unknown,
            called_agent: None,
            response: None,
            message: Some(message.into()),
        }
    }

    pub fn error(intent: Option<Intent>, message: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            called_agent: intent.map(|i| i.as_str().to_string()),
            response: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intent_labels_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_label(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::from_label("none"), None);
        assert_eq!(Intent::from_label("meteo"), None);
    }

    #[test]
    fn test_envelope_success_serialization() {
        let envelope = ResponseEnvelope::success(
            Intent::FlightSearch,
            json!({ "result": "3 vols trouvés" }),
        );

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["called_agent"], "vols");
        assert_eq!(value["response"]["result"], "3 vols trouvés");
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_envelope_unknown_omits_agent() {
        let envelope = ResponseEnvelope::unknown("Aucun agent approprié détecté.");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["status"], "unknown");
        assert!(value.get("called_agent").is_none());
        assert!(value.get("response").is_none());
    }
}
