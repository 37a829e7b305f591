//! Agent Router
//!
//! A natural-language front door that routes a free-text user request to one
//! of several independent backend agents (flight search, stock lookup, task
//! reminders) and returns a unified response envelope:
//! - Classifies intent with a single LLM call constrained to structured JSON
//! - Resolves the target agent in a static endpoint registry
//! - Shapes the outbound payload per endpoint policy
//! - Dispatches once with a bounded timeout, no retries
//! - Normalizes every outcome into one caller-facing envelope
//!
//! PIPELINE:
//! INPUT → CLASSIFY → {unknown, failed, matched} → DISPATCH → ENVELOPE

pub mod api;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod groq;
pub mod models;
pub mod payload;
pub mod registry;
pub mod router;

pub use error::{Result, RouterError};

// Re-export common types
pub use models::*;
pub use router::RouterService;
