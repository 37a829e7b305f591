//! Downstream dispatch
//!
//! Performs the single outbound POST to the resolved agent endpoint and
//! classifies transport/HTTP outcomes into typed results. One attempt per
//! request; retry policy belongs to a surrounding layer so request latency
//! stays bounded.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{Result, RouterError};
use crate::models::{DispatchOutcome, EndpointDescriptor};

/// Seam for the outbound call, so the routing pipeline can be exercised
/// without a network.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn send(&self, descriptor: &EndpointDescriptor, payload: &Value) -> DispatchOutcome;
}

/// Production dispatcher using a pooled reqwest client shared across
/// requests. The timeout bounds each individual call, so one stuck
/// downstream never stalls requests routed elsewhere.
pub struct HttpDispatcher {
    client: Client,
    timeout: Duration,
}

impl HttpDispatcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| RouterError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    async fn post_json(&self, descriptor: &EndpointDescriptor, payload: &Value) -> Result<Value> {
        let response = self
            .client
            .post(&descriptor.address)
            .header("Content-Type", "application/json")
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RouterError::DownstreamTimeout
                } else {
                    RouterError::DownstreamUnreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouterError::DownstreamHttp {
                status: status.as_u16(),
            });
        }

        // Read the body as text first so a non-JSON 2xx reply is reported as
        // a format error, not a transport error.
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RouterError::DownstreamTimeout
            } else {
                RouterError::DownstreamUnreachable(e.to_string())
            }
        })?;

        serde_json::from_str(&text).map_err(|e| RouterError::DownstreamFormat(e.to_string()))
    }
}

#[async_trait]
impl Dispatch for HttpDispatcher {
    async fn send(&self, descriptor: &EndpointDescriptor, payload: &Value) -> DispatchOutcome {
        info!(agent = %descriptor.intent, url = %descriptor.address, "Dispatching to agent");

        match self.post_json(descriptor, payload).await {
            Ok(body) => DispatchOutcome {
                called: descriptor.intent,
                body: Some(body),
                error: None,
            },
            Err(e) => {
                warn!(agent = %descriptor.intent, "Dispatch failed: {}", e);
                DispatchOutcome {
                    called: descriptor.intent,
                    body: None,
                    error: Some(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Intent, PayloadMode};
    use axum::{extract::State, routing::post, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn descriptor(address: String) -> EndpointDescriptor {
        EndpointDescriptor {
            intent: Intent::FlightSearch,
            address,
            payload_mode: PayloadMode::Passthrough,
        }
    }

    /// Bind a local server running `router` on an ephemeral port, returning
    /// its base address.
    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_success_parses_json_body() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/vols/start",
                post(|State(hits): State<Arc<AtomicUsize>>, Json(body): Json<Value>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "status": "success", "result": body }))
                }),
            )
            .with_state(hits.clone());
        let base = spawn_server(router).await;

        let dispatcher = HttpDispatcher::new(Duration::from_secs(5)).unwrap();
        let payload = json!({ "destination": "Paris" });
        let outcome = dispatcher
            .send(&descriptor(format!("{base}/vols/start")), &payload)
            .await;

        assert!(outcome.succeeded());
        assert_eq!(outcome.called, Intent::FlightSearch);
        let body = outcome.body.unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["result"]["destination"], "Paris");
        // exactly one attempt
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_2xx_is_http_error() {
        let router = Router::new().route(
            "/vols/start",
            post(|| async {
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "boom" })),
                )
            }),
        );
        let base = spawn_server(router).await;

        let dispatcher = HttpDispatcher::new(Duration::from_secs(5)).unwrap();
        let outcome = dispatcher
            .send(&descriptor(format!("{base}/vols/start")), &json!({}))
            .await;

        assert!(!outcome.succeeded());
        assert!(matches!(
            outcome.error,
            Some(RouterError::DownstreamHttp { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_non_json_body_is_format_error() {
        let router = Router::new().route("/vols/start", post(|| async { "pas du json" }));
        let base = spawn_server(router).await;

        let dispatcher = HttpDispatcher::new(Duration::from_secs(5)).unwrap();
        let outcome = dispatcher
            .send(&descriptor(format!("{base}/vols/start")), &json!({}))
            .await;

        assert!(!outcome.succeeded());
        assert!(matches!(
            outcome.error,
            Some(RouterError::DownstreamFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // Nothing listens here; the bound-then-dropped listener frees a port
        // that refuses connections.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dispatcher = HttpDispatcher::new(Duration::from_secs(5)).unwrap();
        let outcome = dispatcher
            .send(&descriptor(format!("http://{addr}/vols/start")), &json!({}))
            .await;

        assert!(!outcome.succeeded());
        assert!(matches!(
            outcome.error,
            Some(RouterError::DownstreamUnreachable(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_downstream_times_out() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/vols/start",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!({ "status": "success" }))
                }),
            )
            .with_state(hits.clone());
        let base = spawn_server(router).await;

        let dispatcher = HttpDispatcher::new(Duration::from_millis(200)).unwrap();
        let outcome = dispatcher
            .send(&descriptor(format!("{base}/vols/start")), &json!({}))
            .await;

        assert!(!outcome.succeeded());
        assert!(matches!(outcome.error, Some(RouterError::DownstreamTimeout)));
        // no retry after the timeout
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
