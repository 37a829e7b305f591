use agent_router::{
    api::start_server,
    classifier::GroqClassifier,
    config::RouterConfig,
    dispatcher::HttpDispatcher,
    groq::GroqClient,
    registry::EndpointRegistry,
    router::RouterService,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Configuration errors are fatal: the process must not serve traffic it
    // cannot route.
    let config = RouterConfig::from_env()?;

    info!("🚀 Agent Router - API Server");
    info!("📍 Port: {}", config.port);

    // Create components (once; reused across requests)
    let registry = Arc::new(EndpointRegistry::from_config(&config)?);
    let groq = GroqClient::new(
        config.groq_api_key.clone(),
        config.groq_model.clone(),
        config.groq_base_url.clone(),
    )?;
    let classifier = Box::new(GroqClassifier::new(groq));
    let dispatcher = Box::new(HttpDispatcher::new(config.dispatch_timeout)?);

    let router = Arc::new(RouterService::new(classifier, registry, dispatcher));

    info!("✅ Router initialized");
    info!("📡 Starting API server...");

    start_server(router, config.port).await?;

    Ok(())
}
