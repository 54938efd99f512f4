pub mod config;
pub mod error;

// Recipe data
pub mod dataset;

// Query routing and the fallback
pub mod llm;
pub mod router;

// Front ends
pub mod api;
pub mod chat;
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use router::{Answer, QueryRouter, Route};
