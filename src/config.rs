//! Process configuration
//!
//! Loaded once at startup from the environment (after `dotenv`), read-only
//! for the lifetime of the process. Missing required values are fatal here,
//! never deferred to request time.

use std::env;
use std::time::Duration;

use crate::error::{Result, RouterError};

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub groq_api_key: String,
    pub groq_model: String,
    pub groq_base_url: String,
    pub vols_url: String,
    pub stock_url: String,
    pub rappels_url: String,
    pub dispatch_timeout: Duration,
    pub port: u16,
}

impl RouterConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let groq_api_key = env::var("GROQ_API_KEY")
            .map_err(|_| RouterError::Configuration("GROQ_API_KEY not set".to_string()))?;

        if groq_api_key.trim().is_empty() {
            return Err(RouterError::Configuration(
                "GROQ_API_KEY is empty".to_string(),
            ));
        }

        let timeout_secs = match env::var("DISPATCH_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                RouterError::Configuration(format!(
                    "DISPATCH_TIMEOUT_SECS is not a valid number of seconds: {raw}"
                ))
            })?,
            Err(_) => DEFAULT_DISPATCH_TIMEOUT_SECS,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                RouterError::Configuration(format!("PORT is not a valid port number: {raw}"))
            })?,
            Err(_) => 8000,
        };

        Ok(Self {
            groq_api_key,
            groq_model: env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_GROQ_MODEL.to_string()),
            groq_base_url: env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GROQ_BASE_URL.to_string()),
            vols_url: env::var("AGENT_VOLS_URL")
                .unwrap_or_else(|_| "http://localhost:8001/vols/start".to_string()),
            stock_url: env::var("AGENT_STOCK_URL")
                .unwrap_or_else(|_| "http://localhost:8002/stock/start".to_string()),
            rappels_url: env::var("AGENT_RAPPELS_URL")
                .unwrap_or_else(|_| "http://localhost:8003/rappels/start".to_string()),
            dispatch_timeout: Duration::from_secs(timeout_secs),
            port,
        })
    }
}
