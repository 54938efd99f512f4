use serde::{Deserialize, Serialize};

use crate::router::{Route, Tool};

/// Ask request body
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

/// Routed answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub route: Route,
    pub answer: String,
    /// True when the fallback failed and the apology was returned
    pub degraded: bool,
}

/// Tool query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct ToolParams {
    #[serde(default)]
    pub q: String,
}

/// Direct tool result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    pub tool: Tool,
    pub found: bool,
    pub answer: String,
}

/// Dataset statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_recipes: usize,
    pub dataset_source: String,
    pub generator: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub recipe_table: String,
}
