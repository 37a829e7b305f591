//! Routing pipeline
//!
//! INPUT → CLASSIFY → {unknown, failed, matched} → DISPATCH → ENVELOPE
//!
//! Collaborators are constructed once at startup and injected; the service
//! holds no mutable state, so concurrent requests share it freely.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::dispatcher::Dispatch;
use crate::error::RouterError;
use crate::models::{Intent, ResponseEnvelope, RoutingDecision};
use crate::payload::build_payload;
use crate::registry::EndpointRegistry;

pub struct RouterService {
    classifier: Box<dyn Classifier>,
    registry: Arc<EndpointRegistry>,
    dispatcher: Box<dyn Dispatch>,
}

impl RouterService {
    pub fn new(
        classifier: Box<dyn Classifier>,
        registry: Arc<EndpointRegistry>,
        dispatcher: Box<dyn Dispatch>,
    ) -> Self {
        Self {
            classifier,
            registry,
            dispatcher,
        }
    }

    /// Route one message end to end. Every path terminates in exactly one
    /// envelope; per-request errors are folded in here and never escape.
    pub async fn route(&self, message: &str) -> ResponseEnvelope {
        let request_id = Uuid::new_v4();
        info!(%request_id, "Requête reçue: {}", message);

        let decision = match self.classifier.classify(message).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(%request_id, "Classification failed: {}", e);
                return ResponseEnvelope::error(None, format!("Échec de la classification: {e}"));
            }
        };

        let Some(intent) = decision.intent else {
            info!(%request_id, "Aucun agent approprié détecté");
            return ResponseEnvelope::unknown("Aucun agent approprié détecté.");
        };

        let Some(descriptor) = self.registry.resolve(intent) else {
            // Startup validation guarantees coverage; this is unreachable in
            // a correctly constructed service.
            return ResponseEnvelope::error(
                Some(intent),
                format!("Aucun endpoint enregistré pour l'agent {intent}"),
            );
        };

        let payload = build_payload(&decision, descriptor, message);
        log_decision(request_id, &decision, intent);

        let outcome = self.dispatcher.send(descriptor, &payload).await;

        match (outcome.body, outcome.error) {
            (Some(body), None) => {
                info!(%request_id, agent = %intent, "Dispatch succeeded");
                ResponseEnvelope::success(intent, body)
            }
            (_, Some(e)) => ResponseEnvelope::error(Some(intent), dispatch_failure_message(intent, &e)),
            (None, None) => {
                // A dispatcher must set a body or an error.
                ResponseEnvelope::error(
                    Some(intent),
                    format!("Erreur de communication avec l'agent {intent}"),
                )
            }
        }
    }
}

fn log_decision(request_id: Uuid, decision: &RoutingDecision, intent: Intent) {
    info!(
        %request_id,
        agent = %intent,
        params = %serde_json::Value::Object(decision.parameters.clone()),
        "Routing decision"
    );
}

/// Caller-facing message for a failed dispatch, keyed by error kind.
fn dispatch_failure_message(intent: Intent, error: &RouterError) -> String {
    match error {
        RouterError::DownstreamHttp { status } => {
            format!("Erreur de communication avec l'agent {intent} (HTTP {status})")
        }
        RouterError::DownstreamTimeout => {
            format!("L'agent {intent} n'a pas répondu dans le délai imparti")
        }
        RouterError::DownstreamUnreachable(_) => {
            format!("Erreur de communication avec l'agent {intent}: service injoignable")
        }
        RouterError::DownstreamFormat(_) => {
            format!("Réponse invalide de l'agent {intent}")
        }
        other => format!("Erreur de communication avec l'agent {intent}: {other}"),
    }
}
