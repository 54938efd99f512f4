use crate::config::RouterConfig;
use crate::dataset::{Recipe, RecipeTable};
use crate::router::format::{format_recipe, format_title_list};
use crate::router::normalize::keywords;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rule-based tools, declared in routing priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Title,
    Ingredients,
    Method,
    Easy,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Title, Tool::Ingredients, Tool::Method, Tool::Easy];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Title => "title",
            Tool::Ingredients => "ingredients",
            Tool::Method => "method",
            Tool::Easy => "easy",
        }
    }

    /// Run the tool against an already normalized query
    pub fn run(&self, normalized: &str, table: &RecipeTable, config: &RouterConfig) -> ToolOutcome {
        match self {
            Tool::Title => search_by_title(normalized, table),
            Tool::Ingredients => search_by_ingredients(normalized, table, config),
            Tool::Method => search_by_method(normalized, table, config),
            Tool::Easy => recommend_easy(normalized, table, config),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown tool: {s}"))
    }
}

/// Result of a single tool. A miss is a value, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Found(String),
    NotFound(NotFound),
}

impl ToolOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ToolOutcome::Found(_))
    }

    /// Found text, or the localized not-found message
    pub fn into_text(self) -> String {
        match self {
            ToolOutcome::Found(text) => text,
            ToolOutcome::NotFound(reason) => reason.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    Title,
    NoIngredientKeywords,
    Ingredients,
    Method,
    Easy,
}

impl NotFound {
    pub fn message(&self) -> &'static str {
        match self {
            NotFound::Title => "❌ Resep tidak ditemukan berdasarkan judul.",
            NotFound::NoIngredientKeywords => "❌ Tidak ditemukan keyword bahan valid.",
            NotFound::Ingredients => "❌ Tidak ada resep dengan bahan tersebut.",
            NotFound::Method => "❌ Tidak ditemukan metode memasak yang sesuai.",
            NotFound::Easy => "❌ Tidak ada masakan mudah yang cocok.",
        }
    }
}

fn titles<'a>(recipes: &'a [&'a Recipe]) -> impl Iterator<Item = &'a str> + 'a {
    recipes.iter().map(|r| r.title())
}

/// First recipe whose title contains the query, else first whose title the query contains
pub fn search_by_title(normalized: &str, table: &RecipeTable) -> ToolOutcome {
    if normalized.is_empty() {
        return ToolOutcome::NotFound(NotFound::Title);
    }

    let found = table
        .iter()
        .find(|r| r.title_normalized().contains(normalized))
        .or_else(|| {
            table.iter().find(|r| {
                let title = r.title_normalized();
                !title.is_empty() && contains_phrase(normalized, title)
            })
        });

    match found {
        Some(recipe) => ToolOutcome::Found(format_recipe(recipe)),
        None => ToolOutcome::NotFound(NotFound::Title),
    }
}

/// Up to `max_results` recipes whose ingredients contain every query keyword
pub fn search_by_ingredients(
    normalized: &str,
    table: &RecipeTable,
    config: &RouterConfig,
) -> ToolOutcome {
    let keywords = keywords(normalized, config);
    if keywords.is_empty() {
        return ToolOutcome::NotFound(NotFound::NoIngredientKeywords);
    }

    let matches: Vec<&Recipe> = table
        .iter()
        .filter(|r| {
            let ingredients = r.ingredients_normalized();
            keywords.iter().all(|k| ingredients.contains(k))
        })
        .take(config.max_results)
        .collect();

    if matches.is_empty() {
        return ToolOutcome::NotFound(NotFound::Ingredients);
    }

    ToolOutcome::Found(format_title_list(
        "✅ Masakan dengan bahan tersebut:",
        titles(&matches),
    ))
}

/// Up to `max_results` recipes whose steps mention the first matching cooking verb
pub fn search_by_method(
    normalized: &str,
    table: &RecipeTable,
    config: &RouterConfig,
) -> ToolOutcome {
    for method in &config.methods {
        if !normalized.contains(method.as_str()) {
            continue;
        }

        let matches: Vec<&Recipe> = table
            .iter()
            .filter(|r| r.steps_normalized().contains(method.as_str()))
            .take(config.max_results)
            .collect();

        if !matches.is_empty() {
            return ToolOutcome::Found(format_title_list(
                &format!("✅ Masakan yang dimasak dengan cara {method}:"),
                titles(&matches),
            ));
        }
    }

    ToolOutcome::NotFound(NotFound::Method)
}

/// Up to `max_results` easy recipes, when the query asks for easy ones
pub fn recommend_easy(normalized: &str, table: &RecipeTable, config: &RouterConfig) -> ToolOutcome {
    let asks_easy = config
        .easy_terms
        .iter()
        .any(|term| normalized.contains(term.as_str()));
    if !asks_easy {
        return ToolOutcome::NotFound(NotFound::Easy);
    }

    let matches: Vec<&Recipe> = table
        .iter()
        .filter(|r| is_easy(r, config))
        .take(config.max_results)
        .collect();

    if matches.is_empty() {
        return ToolOutcome::NotFound(NotFound::Easy);
    }

    ToolOutcome::Found(format_title_list(
        "🍳 Rekomendasi masakan mudah:",
        titles(&matches),
    ))
}

/// A difficulty label decides when present; otherwise short steps mean easy
pub fn is_easy(recipe: &Recipe, config: &RouterConfig) -> bool {
    match recipe.difficulty_normalized() {
        Some(label) => config.easy_labels.iter().any(|l| l == label),
        None => recipe.steps_len() < config.easy_steps_threshold,
    }
}

/// Whole-word containment of `phrase` inside `text` (both normalized)
fn contains_phrase(text: &str, phrase: &str) -> bool {
    text == phrase
        || text.starts_with(&format!("{phrase} "))
        || text.ends_with(&format!(" {phrase}"))
        || text.contains(&format!(" {phrase} "))
}
