use crate::router::normalize::normalize_text;
use serde::Serialize;
use std::sync::Arc;

/// A single recipe row. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    title: String,
    ingredients: String,
    steps: String,
    difficulty: Option<String>,
    method: Option<String>,
    #[serde(skip)]
    normalized: NormalizedFields,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct NormalizedFields {
    title: String,
    ingredients: String,
    steps: String,
    difficulty: Option<String>,
}

impl Recipe {
    pub fn new(
        title: impl Into<String>,
        ingredients: impl Into<String>,
        steps: impl Into<String>,
    ) -> Self {
        Self::with_labels(title, ingredients, steps, None, None)
    }

    pub fn with_labels(
        title: impl Into<String>,
        ingredients: impl Into<String>,
        steps: impl Into<String>,
        difficulty: Option<String>,
        method: Option<String>,
    ) -> Self {
        let title = title.into();
        let ingredients = ingredients.into();
        let steps = steps.into();
        let difficulty = difficulty.filter(|d| !d.trim().is_empty());
        let method = method.filter(|m| !m.trim().is_empty());

        let normalized = NormalizedFields {
            title: normalize_text(&title),
            ingredients: normalize_text(&ingredients),
            steps: normalize_text(&steps),
            difficulty: difficulty.as_deref().map(normalize_text),
        };

        Self {
            title,
            ingredients,
            steps,
            difficulty,
            method,
            normalized,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn ingredients(&self) -> &str {
        &self.ingredients
    }

    pub fn steps(&self) -> &str {
        &self.steps
    }

    pub fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn title_normalized(&self) -> &str {
        &self.normalized.title
    }

    pub fn ingredients_normalized(&self) -> &str {
        &self.normalized.ingredients
    }

    pub fn steps_normalized(&self) -> &str {
        &self.normalized.steps
    }

    pub fn difficulty_normalized(&self) -> Option<&str> {
        self.normalized.difficulty.as_deref()
    }

    /// Character count of the raw steps text
    pub fn steps_len(&self) -> usize {
        self.steps.chars().count()
    }
}

/// Read-only recipe collection shared across requests
#[derive(Debug, Clone, Default)]
pub struct RecipeTable {
    recipes: Arc<[Recipe]>,
}

impl RecipeTable {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: recipes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.recipes.iter()
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl FromIterator<Recipe> for RecipeTable {
    fn from_iter<I: IntoIterator<Item = Recipe>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecipeTable {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}
