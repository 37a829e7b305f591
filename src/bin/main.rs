//! One-shot CLI: route a single message from the command line and print the
//! resulting envelope. Useful for smoke-testing the pipeline against live
//! downstream agents without the HTTP surface.

use agent_router::{
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
        .with_max_level(tracing::Level::DEBUG)
        .init();

    dotenv::dotenv().ok();

    let message = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if message.trim().is_empty() {
        eprintln!("Usage: router <message>");
        eprintln!("Exemple: router \"Quels vols pour Paris en dessous de 800 euros le 01/09/2025\"");
        std::process::exit(2);
    }

    let config = RouterConfig::from_env()?;

    let registry = Arc::new(EndpointRegistry::from_config(&config)?);
    let groq = GroqClient::new(
        config.groq_api_key.clone(),
        config.groq_model.clone(),
        config.groq_base_url.clone(),
    )?;
    let router = RouterService::new(
        Box::new(GroqClassifier::new(groq)),
        registry,
        Box::new(HttpDispatcher::new(config.dispatch_timeout)?),
    );

    info!("Routing message: {}", message);

    let envelope = router.route(&message).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    Ok(())
}
