//! Endpoint registry
//!
//! Maps each intent to the downstream agent address and payload-shaping
//! policy. Built once at startup and read-only afterwards, so concurrent
//! lookups need no locking.

use std::collections::HashMap;

use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::models::{EndpointDescriptor, Intent, PayloadMode};

#[derive(Debug)]
pub struct EndpointRegistry {
    endpoints: HashMap<Intent, EndpointDescriptor>,
}

impl EndpointRegistry {
    /// Build the registry from configuration.
    ///
    /// Every known intent must have exactly one descriptor; a router that can
    /// classify an intent it cannot dispatch is misconfigured, so coverage is
    /// checked here and missing entries abort startup.
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let entries = [
            (Intent::FlightSearch, &config.vols_url, PayloadMode::Passthrough),
            (Intent::StockQuery, &config.stock_url, PayloadMode::WrapAsInput),
            (Intent::ReminderRun, &config.rappels_url, PayloadMode::Passthrough),
        ];

        let mut endpoints = HashMap::new();
        for (intent, address, payload_mode) in entries {
            if address.trim().is_empty() {
                return Err(RouterError::Configuration(format!(
                    "no downstream address configured for agent '{intent}'"
                )));
            }
            endpoints.insert(
                intent,
                EndpointDescriptor {
                    intent,
                    address: address.clone(),
                    payload_mode,
                },
            );
        }

        for intent in Intent::ALL {
            if !endpoints.contains_key(&intent) {
                return Err(RouterError::Configuration(format!(
                    "no endpoint registered for agent '{intent}'"
                )));
            }
        }

        Ok(Self { endpoints })
    }

    pub fn resolve(&self, intent: Intent) -> Option<&EndpointDescriptor> {
        self.endpoints.get(&intent)
    }

    pub fn list(&self) -> Vec<&EndpointDescriptor> {
        self.endpoints.values().collect()
    }
}
