use crate::config::{FallbackStrategy, RouterConfig};
use crate::dataset::{Recipe, RecipeTable};
use crate::router::format::{format_recipe, format_reference};
use crate::router::normalize::keywords;
use rand::seq::SliceRandom;
use rand::Rng;

const OFFLINE_HEADER: &str = "🤷 Tidak ditemukan informasi relevan. Coba ini:";
const OFFLINE_EMPTY: &str = "🤷 Tidak ditemukan informasi relevan.";

/// Pick up to `count` reference recipes for the fallback.
///
/// With the keyword strategy, rows whose title or ingredients contain any
/// query keyword are sampled first and the remainder is filled uniformly at
/// random from the other rows.
pub fn select_references<'a, R: Rng + ?Sized>(
    normalized: &str,
    table: &'a RecipeTable,
    config: &RouterConfig,
    count: usize,
    rng: &mut R,
) -> Vec<&'a Recipe> {
    let rows = table.as_slice();

    let (candidates, rest): (Vec<&Recipe>, Vec<&Recipe>) = match config.fallback_strategy {
        FallbackStrategy::Random => (Vec::new(), rows.iter().collect()),
        FallbackStrategy::Keyword => {
            let keywords = keywords(normalized, config);
            rows.iter().partition(|r| {
                keywords.iter().any(|k| {
                    r.title_normalized().contains(k) || r.ingredients_normalized().contains(k)
                })
            })
        }
    };

    let mut picked: Vec<&Recipe> = candidates.choose_multiple(rng, count).copied().collect();
    let missing = count.saturating_sub(picked.len());
    picked.extend(rest.choose_multiple(rng, missing).copied());
    picked
}

/// Prompt sent to the text generator
pub fn build_prompt(query: &str, references: &[&Recipe]) -> String {
    let context = references
        .iter()
        .map(|r| format_reference(r))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Berikut referensi resep masakan:\n\n{}\n\nPertanyaan: {}\nSilakan jawab berdasarkan referensi di atas.",
        context,
        query.trim()
    )
}

/// Answer used when no text generator is configured
pub fn offline_suggestion(references: &[&Recipe]) -> String {
    if references.is_empty() {
        return OFFLINE_EMPTY.to_string();
    }

    let cards = references
        .iter()
        .map(|r| format_recipe(r))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{OFFLINE_HEADER}\n\n{cards}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> RecipeTable {
        let mut recipes: Vec<Recipe> = (0..10)
            .map(|i| Recipe::new(format!("Kue {i}"), "tepung--gula", "Panggang adonan."))
            .collect();
        recipes.push(Recipe::new("Soto Ayam", "ayam--kunyit", "Rebus ayam."));
        recipes.push(Recipe::new("Sate Kambing", "kambing--kecap", "Bakar sate."));
        RecipeTable::new(recipes)
    }

    #[test]
    fn test_keyword_candidates_come_first() {
        let config = RouterConfig::default();
        let table = table();
        let mut rng = StdRng::seed_from_u64(7);

        let picked = select_references("bumbu ayam kambing", &table, &config, 5, &mut rng);

        assert_eq!(picked.len(), 5);
        let mut first_two: Vec<&str> = picked[..2].iter().map(|r| r.title()).collect();
        first_two.sort();
        assert_eq!(first_two, vec!["Sate Kambing", "Soto Ayam"]);
        assert!(picked[2..].iter().all(|r| r.title().starts_with("Kue")));
    }

    #[test]
    fn test_random_strategy_samples_without_repeats() {
        let config = RouterConfig {
            fallback_strategy: FallbackStrategy::Random,
            ..RouterConfig::default()
        };
        let table = table();
        let mut rng = StdRng::seed_from_u64(42);

        let picked = select_references("ayam", &table, &config, 5, &mut rng);
        assert_eq!(picked.len(), 5);

        let mut titles: Vec<&str> = picked.iter().map(|r| r.title()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), 5);
    }

    #[test]
    fn test_same_seed_same_selection() {
        let config = RouterConfig::default();
        let table = table();

        let a = select_references("apa", &table, &config, 3, &mut StdRng::seed_from_u64(1));
        let b = select_references("apa", &table, &config, 3, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_small_table_returns_everything() {
        let config = RouterConfig::default();
        let table = RecipeTable::new(vec![Recipe::new("Soto", "ayam", "Rebus.")]);
        let mut rng = StdRng::seed_from_u64(3);

        let picked = select_references("apa", &table, &config, 5, &mut rng);
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn test_build_prompt() {
        let soto = Recipe::new("Soto", "ayam--kunyit", "Rebus ayam.");
        let prompt = build_prompt("  Apa beda soto dan rawon? ", &[&soto]);

        assert_eq!(
            prompt,
            "Berikut referensi resep masakan:\n\nSoto:\nBahan: ayam--kunyit\nLangkah: Rebus ayam.\n\nPertanyaan: Apa beda soto dan rawon?\nSilakan jawab berdasarkan referensi di atas."
        );
    }

    #[test]
    fn test_offline_suggestion() {
        let soto = Recipe::new("Soto", "ayam", "Rebus ayam.");
        let text = offline_suggestion(&[&soto]);
        assert!(text.starts_with("🤷 Tidak ditemukan informasi relevan. Coba ini:\n\n🍽 Soto"));

        assert_eq!(offline_suggestion(&[]), "🤷 Tidak ditemukan informasi relevan.");
    }
}
