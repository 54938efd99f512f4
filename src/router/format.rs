use crate::dataset::Recipe;
use crate::utils::text::capitalize;
use regex::Regex;
use std::sync::LazyLock;

static INGREDIENT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n|--|,").expect("static regex"));

/// Split free-text ingredients into display items
pub fn ingredient_items(ingredients: &str) -> Vec<String> {
    INGREDIENT_SEPARATOR
        .split(ingredients)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(capitalize)
        .collect()
}

/// Render a recipe as a chat card
pub fn format_recipe(recipe: &Recipe) -> String {
    let bullets = ingredient_items(recipe.ingredients())
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut card = format!(
        "🍽 {}\n\n**Bahan-bahan:**\n{}\n\n**Langkah Memasak:**\n{}",
        recipe.title(),
        bullets,
        recipe.steps().trim()
    );

    if let Some(difficulty) = recipe.difficulty() {
        card.push_str(&format!("\n\n**Tingkat Kesulitan:** {difficulty}"));
    }
    if let Some(method) = recipe.method() {
        card.push_str(&format!("\n**Metode:** {method}"));
    }

    card
}

/// Header line followed by one bullet per title
pub fn format_title_list<'a>(header: &str, titles: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = header.to_string();
    for title in titles {
        out.push_str("\n- ");
        out.push_str(title);
    }
    out
}

/// Plain-text reference block spliced into the fallback prompt
pub fn format_reference(recipe: &Recipe) -> String {
    format!(
        "{}:\nBahan: {}\nLangkah: {}",
        recipe.title(),
        recipe.ingredients(),
        recipe.steps()
    )
}
