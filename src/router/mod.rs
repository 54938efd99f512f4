// Query routing: a fixed priority chain of rule-based tools over the
// recipe table, with text generation as the last resort

pub mod fallback;
pub mod format;
pub mod normalize;
pub mod tools;

use crate::config::RouterConfig;
use crate::dataset::RecipeTable;
use crate::error::Result;
use crate::llm::TextGenerator;
use crate::utils::text::truncate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

pub use normalize::normalize_text;
pub use tools::{NotFound, Tool, ToolOutcome};

/// Reply shown when the fallback's external call fails
pub const APOLOGY: &str = "Maaf, terjadi kesalahan saat menjawab. Coba lagi nanti ya.";

/// Which step of the chain produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Title,
    Ingredients,
    Method,
    Easy,
    Fallback,
}

impl From<Tool> for Route {
    fn from(tool: Tool) -> Self {
        match tool {
            Tool::Title => Route::Title,
            Tool::Ingredients => Route::Ingredients,
            Tool::Method => Route::Method,
            Tool::Easy => Route::Easy,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Route::Title => "title",
            Route::Ingredients => "ingredients",
            Route::Method => "method",
            Route::Easy => "easy",
            Route::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub route: Route,
    pub text: String,
}

/// Stateless router over an injected, read-only recipe table
#[derive(Debug, Clone)]
pub struct QueryRouter {
    table: RecipeTable,
    config: Arc<RouterConfig>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl QueryRouter {
    pub fn new(table: RecipeTable, config: RouterConfig) -> Self {
        Self {
            table,
            config: Arc::new(config),
            generator: None,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn table(&self) -> &RecipeTable {
        &self.table
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Run one tool directly, bypassing the chain
    pub fn run_tool(&self, tool: Tool, query: &str) -> ToolOutcome {
        tool.run(&normalize_text(query), &self.table, &self.config)
    }

    /// Evaluate the rule-based tools in priority order; first hit wins
    pub fn match_rules(&self, query: &str) -> Option<Answer> {
        let normalized = normalize_text(query);

        Tool::ALL.into_iter().find_map(|tool| {
            match tool.run(&normalized, &self.table, &self.config) {
                ToolOutcome::Found(text) => Some(Answer {
                    route: tool.into(),
                    text,
                }),
                ToolOutcome::NotFound(_) => None,
            }
        })
    }

    /// Route a query. Only the fallback's external call can fail.
    pub async fn route(&self, query: &str) -> Result<Answer> {
        let mut rng = StdRng::from_entropy();
        self.route_with_rng(query, &mut rng).await
    }

    pub async fn route_with_rng<R: Rng + Send>(&self, query: &str, rng: &mut R) -> Result<Answer> {
        if let Some(answer) = self.match_rules(query) {
            debug!("Query '{}' routed to {}", truncate(query, 60), answer.route);
            return Ok(answer);
        }

        debug!("Query '{}' routed to fallback", truncate(query, 60));
        let text = self.fallback(query, rng).await?;

        Ok(Answer {
            route: Route::Fallback,
            text,
        })
    }

    /// Route a query, turning a fallback failure into the apology
    pub async fn answer(&self, query: &str) -> Answer {
        match self.route(query).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Fallback failed: {}", e.log_safe());
                Answer {
                    route: Route::Fallback,
                    text: APOLOGY.to_string(),
                }
            }
        }
    }

    async fn fallback<R: Rng + Send>(&self, query: &str, rng: &mut R) -> Result<String> {
        let normalized = normalize_text(query);

        let Some(generator) = &self.generator else {
            let references = fallback::select_references(
                &normalized,
                &self.table,
                &self.config,
                self.config.offline_suggestions,
                rng,
            );
            return Ok(fallback::offline_suggestion(&references));
        };

        let prompt = {
            let references = fallback::select_references(
                &normalized,
                &self.table,
                &self.config,
                self.config.fallback_sample_size,
                rng,
            );
            fallback::build_prompt(query, &references)
        };

        generator.generate(&prompt).await
    }
}
