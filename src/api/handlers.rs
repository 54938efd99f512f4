use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{debug, error};

use crate::{
    api::models::*,
    router::{QueryRouter, Route, Tool, APOLOGY},
    utils::text::truncate,
    Error, Result,
};

/// Longest query accepted, in characters
const MAX_QUERY_CHARS: usize = 1000;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub router: QueryRouter,
    pub settings: crate::config::Settings,
}

fn validate_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::Validation("Query must not be empty".to_string()));
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(Error::Validation(format!(
            "Query must be at most {MAX_QUERY_CHARS} characters"
        )));
    }
    Ok(query)
}

/// POST /api/ask - Route a free-text query
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let query = validate_query(&request.query)?;
    debug!("Ask request: {}", truncate(query, 60));

    let response = match state.router.route(query).await {
        Ok(answer) => AskResponse {
            route: answer.route,
            answer: answer.text,
            degraded: false,
        },
        Err(e) if e.is_external() => {
            error!("Fallback failed: {}", e.log_safe());
            AskResponse {
                route: Route::Fallback,
                answer: APOLOGY.to_string(),
                degraded: true,
            }
        }
        Err(e) => return Err(e),
    };

    Ok(Json(response))
}

/// GET /api/tools/:tool - Run a single rule-based tool
pub async fn run_tool(
    State(state): State<AppState>,
    Path(tool): Path<String>,
    Query(params): Query<ToolParams>,
) -> Result<Json<ToolResponse>> {
    let tool: Tool = tool.parse().map_err(Error::NotFound)?;
    let query = validate_query(&params.q)?;
    debug!("Tool request: {} {}", tool, truncate(query, 60));

    let outcome = state.router.run_tool(tool, query);

    Ok(Json(ToolResponse {
        tool,
        found: outcome.is_found(),
        answer: outcome.into_text(),
    }))
}

/// GET /api/stats - Dataset statistics
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    debug!("Get stats request");

    Ok(Json(Stats {
        total_recipes: state.router.table().len(),
        dataset_source: state.settings.dataset.source.clone(),
        generator: state.router.has_generator(),
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let table_ready = !state.router.table().is_empty();

    Ok(Json(ReadinessResponse {
        ready: table_ready,
        recipe_table: if table_ready { "ok" } else { "empty" }.to_string(),
    }))
}
