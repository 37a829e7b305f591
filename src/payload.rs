//! Outbound payload shaping
//!
//! Pure mapping from a routing decision plus a registry entry to the JSON
//! body sent downstream. No I/O, no failure modes.

use serde_json::{json, Value};

use crate::models::{EndpointDescriptor, PayloadMode, RoutingDecision};

/// Build the body for the resolved endpoint.
///
/// `Passthrough` forwards the classifier's parameters verbatim, even when
/// empty. `WrapAsInput` sends the whole raw message as `{"input": ...}` and
/// ignores extracted parameters, for backends whose contract is the full
/// natural-language message rather than structured arguments.
pub fn build_payload(
    decision: &RoutingDecision,
    descriptor: &EndpointDescriptor,
    raw_message: &str,
) -> Value {
    match descriptor.payload_mode {
        PayloadMode::Passthrough => Value::Object(decision.parameters.clone()),
        PayloadMode::WrapAsInput => json!({ "input": raw_message }),
    }
}
