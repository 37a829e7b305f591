//! Intent classifier
//!
//! Sends the user message to the language model with a fixed routing
//! instruction and parses the reply into a structured `RoutingDecision`.
//! Routing quality lives entirely in the instruction plus the model; the
//! router code stays backend-agnostic.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::{Result, RouterError};
use crate::groq::GroqClient;
use crate::models::{Intent, RoutingDecision};

/// The fixed routing instruction. Its text and the two required reply keys
/// (`agent`, `params`) are the contract surface this component depends on;
/// changing it is a contract change.
const ROUTING_PROMPT: &str = r#"
Tu es un routeur intelligent d'agents IA. À partir du message utilisateur, tu dois :
1. Identifier quel agent appeler : "vols", "stock", ou "rappels"
2. Extraire les paramètres nécessaires pour cet agent sous forme de JSON valide
3. Si rien ne correspond, réponds {"agent": "none", "params": {}}

Exemples:
- "Quels vols pour Paris demain ?" => {"agent": "vols", "params": {"destination": "Paris", "date": "demain"}}
- "Stock de produit XYZ" => {"agent": "stock", "params": {"produit": "XYZ"}}

Réponds UNIQUEMENT avec un objet JSON valide, sans texte autour.
"#;

/// Turns a raw user message into a routing decision.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, message: &str) -> Result<RoutingDecision>;
}

/// Production classifier backed by the Groq API.
pub struct GroqClassifier {
    client: GroqClient,
}

impl GroqClassifier {
    pub fn new(client: GroqClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Classifier for GroqClassifier {
    async fn classify(&self, message: &str) -> Result<RoutingDecision> {
        let reply = self.client.chat(ROUTING_PROMPT, message).await?;
        info!("LLM routing reply: {}", reply);

        parse_decision(&reply)
    }
}

/// Parse the model reply into a `RoutingDecision`.
///
/// The reply is untrusted text: it is decoded with exhaustive validation and
/// any missing, extra-typed, or unknown field produces a
/// `ClassificationFormat` error rather than a guess. No substring fallback.
pub fn parse_decision(reply: &str) -> Result<RoutingDecision> {
    let cleaned = reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        RouterError::ClassificationFormat(format!("reply is not valid JSON: {e} | raw={reply}"))
    })?;

    let object = value.as_object().ok_or_else(|| {
        RouterError::ClassificationFormat(format!("reply is not a JSON object: {cleaned}"))
    })?;

    let intent = match object.get("agent") {
        None => return Ok(RoutingDecision::unmatched()),
        Some(Value::String(label)) if label == "none" => {
            return Ok(RoutingDecision::unmatched());
        }
        Some(Value::String(label)) => Intent::from_label(label).ok_or_else(|| {
            RouterError::ClassificationFormat(format!("unknown agent label: {label}"))
        })?,
        Some(other) => {
            return Err(RouterError::ClassificationFormat(format!(
                "agent field is not a string: {other}"
            )));
        }
    };

    let parameters = match object.get("params") {
        None => serde_json::Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            return Err(RouterError::ClassificationFormat(format!(
                "params field is not an object: {other}"
            )));
        }
    };

    Ok(RoutingDecision {
        intent: Some(intent),
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_known_intent_with_params() {
        let decision = parse_decision(
            r#"{"agent": "vols", "params": {"destination": "Paris", "max_price": 800, "date": "01/09/2025"}}"#,
        )
        .unwrap();

        assert_eq!(decision.intent, Some(Intent::FlightSearch));
        assert_eq!(decision.parameters["destination"], json!("Paris"));
        assert_eq!(decision.parameters["max_price"], json!(800));
        assert_eq!(decision.parameters["date"], json!("01/09/2025"));
    }

    #[test]
    fn test_parse_fenced_reply() {
        let decision =
            parse_decision("```json\n{\"agent\": \"stock\", \"params\": {}}\n```").unwrap();
        assert_eq!(decision.intent, Some(Intent::StockQuery));
        assert!(decision.parameters.is_empty());
    }

    #[test]
    fn test_parse_none_discards_params() {
        let decision =
            parse_decision(r#"{"agent": "none", "params": {"leftover": true}}"#).unwrap();
        assert_eq!(decision.intent, None);
        assert!(decision.parameters.is_empty());
    }

    #[test]
    fn test_parse_absent_agent_is_unmatched() {
        let decision = parse_decision(r#"{"params": {"x": 1}}"#).unwrap();
        assert_eq!(decision.intent, None);
        assert!(decision.parameters.is_empty());
    }

    #[test]
    fn test_parse_absent_params_is_empty() {
        let decision = parse_decision(r#"{"agent": "rappels"}"#).unwrap();
        assert_eq!(decision.intent, Some(Intent::ReminderRun));
        assert!(decision.parameters.is_empty());
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        let err = parse_decision("je ne sais pas").unwrap_err();
        assert!(matches!(err, RouterError::ClassificationFormat(_)));
    }

    #[test]
    fn test_parse_non_object_fails() {
        let err = parse_decision(r#"["vols"]"#).unwrap_err();
        assert!(matches!(err, RouterError::ClassificationFormat(_)));
    }

    #[test]
    fn test_parse_unknown_label_fails() {
        let err = parse_decision(r#"{"agent": "meteo", "params": {}}"#).unwrap_err();
        assert!(matches!(err, RouterError::ClassificationFormat(_)));
        assert!(err.to_string().contains("meteo"));
    }

    #[test]
    fn test_parse_non_string_agent_fails() {
        let err = parse_decision(r#"{"agent": 3, "params": {}}"#).unwrap_err();
        assert!(matches!(err, RouterError::ClassificationFormat(_)));
    }

    #[test]
    fn test_parse_non_object_params_fails() {
        let err = parse_decision(r#"{"agent": "vols", "params": "Paris"}"#).unwrap_err();
        assert!(matches!(err, RouterError::ClassificationFormat(_)));
    }
}
