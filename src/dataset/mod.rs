// Recipe dataset loading
// Reads the recipe CSV from disk or over HTTP into an immutable RecipeTable

pub mod models;

use crate::config::DatasetConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub use models::{Recipe, RecipeTable};

const TITLE_HEADERS: &[&str] = &["title", "judul"];
const INGREDIENT_HEADERS: &[&str] = &["ingredients", "bahan"];
const STEP_HEADERS: &[&str] = &["steps", "langkah"];
const DIFFICULTY_HEADERS: &[&str] = &["difficulty", "tingkat"];
const METHOD_HEADERS: &[&str] = &["method", "metode"];

/// Where the recipe CSV comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(Url),
    Path(std::path::PathBuf),
}

impl DatasetSource {
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            let url = Url::parse(source)?;
            if url.host_str().is_none() {
                return Err(Error::Validation(
                    "Dataset URL must have a valid host".to_string(),
                ));
            }
            return Ok(Self::Url(url));
        }

        if source.contains("://") {
            return Err(Error::Validation(format!(
                "Dataset source must be a file path or an http(s) URL: {source}"
            )));
        }

        Ok(Self::Path(source.into()))
    }
}

/// Summary of a CSV parse, used for logging and `inspect`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: usize,
    pub kept: usize,
    pub incomplete: usize,
    pub duplicates: usize,
}

/// Load the recipe table from the configured source
pub async fn load_table(config: &DatasetConfig) -> Result<(RecipeTable, LoadReport)> {
    let text = match DatasetSource::parse(&config.source)? {
        DatasetSource::Url(url) => fetch_csv(&url, config).await?,
        DatasetSource::Path(path) => {
            debug!("Reading dataset from {}", path.display());
            tokio::fs::read_to_string(&path).await?
        }
    };

    let (table, report) = parse_csv(&text)?;
    info!(
        "Loaded {} recipes ({} rows, {} incomplete, {} duplicates)",
        report.kept, report.rows, report.incomplete, report.duplicates
    );

    if table.is_empty() {
        warn!("Recipe table is empty; every query will reach the fallback");
    }

    Ok((table, report))
}

async fn fetch_csv(url: &Url, config: &DatasetConfig) -> Result<String> {
    debug!("Fetching dataset: {}", url);

    let client = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.fetch_timeout_seconds))
        .build()
        .map_err(Error::Http)?;

    let response = client.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(Error::Dataset(format!(
            "Dataset download failed with HTTP {}",
            response.status()
        )));
    }

    Ok(response.text().await?)
}

/// Parse recipe rows from CSV text.
///
/// Rows missing a title, ingredients or steps are dropped, as are exact
/// duplicates (the first occurrence is kept). Row order is preserved.
pub fn parse_csv(text: &str) -> Result<(RecipeTable, LoadReport)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let find_idx = |names: &[&str]| {
        headers.iter().position(|h| {
            let h_trimmed = h.trim();
            names.iter().any(|name| h_trimmed.eq_ignore_ascii_case(name))
        })
    };

    let title_idx = find_idx(TITLE_HEADERS)
        .ok_or_else(|| Error::Dataset("Missing required header: 'Title'".to_string()))?;
    let ingredients_idx = find_idx(INGREDIENT_HEADERS)
        .ok_or_else(|| Error::Dataset("Missing required header: 'Ingredients'".to_string()))?;
    let steps_idx = find_idx(STEP_HEADERS)
        .ok_or_else(|| Error::Dataset("Missing required header: 'Steps'".to_string()))?;
    let difficulty_idx = find_idx(DIFFICULTY_HEADERS);
    let method_idx = find_idx(METHOD_HEADERS);

    let mut report = LoadReport::default();
    let mut seen = HashSet::new();
    let mut recipes = Vec::new();

    for result in reader.records() {
        let record = result?;
        report.rows += 1;

        let field = |idx: usize| record.get(idx).unwrap_or("").trim();
        let title = field(title_idx);
        let ingredients = field(ingredients_idx);
        let steps = field(steps_idx);

        if title.is_empty() || ingredients.is_empty() || steps.is_empty() {
            report.incomplete += 1;
            continue;
        }

        let difficulty = difficulty_idx.map(|idx| field(idx).to_string());
        let method = method_idx.map(|idx| field(idx).to_string());

        let key = (
            title.to_string(),
            ingredients.to_string(),
            steps.to_string(),
            difficulty.clone(),
            method.clone(),
        );
        if !seen.insert(key) {
            report.duplicates += 1;
            continue;
        }

        recipes.push(Recipe::with_labels(
            title,
            ingredients,
            steps,
            difficulty,
            method,
        ));
    }

    report.kept = recipes.len();
    Ok((RecipeTable::new(recipes), report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Title,Ingredients,Steps,Loves,URL
Nasi Goreng,\"nasi--telur--kecap\",\"Goreng semua bahan.\",10,/a
Nasi Goreng,\"nasi--telur--kecap\",\"Goreng semua bahan.\",10,/a
,\"air\",\"Rebus air.\",1,/b
Sayur Asem,\"asam jawa, labu siam\",\"Rebus semua bahan hingga matang.\",3,/c
Es Teh,,\"Seduh teh.\",0,/d
";

    #[test]
    fn test_parse_csv_drops_incomplete_and_duplicates() {
        let (table, report) = parse_csv(SAMPLE).unwrap();

        assert_eq!(
            report,
            LoadReport {
                rows: 5,
                kept: 2,
                incomplete: 2,
                duplicates: 1,
            }
        );
        let titles: Vec<&str> = table.iter().map(Recipe::title).collect();
        assert_eq!(titles, vec!["Nasi Goreng", "Sayur Asem"]);
    }

    #[test]
    fn test_parse_csv_indonesian_headers_and_labels() {
        let csv = "judul,bahan,langkah,tingkat,metode\nPisang Goreng,pisang,Goreng pisang.,Mudah,goreng\n";
        let (table, _) = parse_csv(csv).unwrap();

        let recipe = table.get(0).unwrap();
        assert_eq!(recipe.title(), "Pisang Goreng");
        assert_eq!(recipe.difficulty(), Some("Mudah"));
        assert_eq!(recipe.method(), Some("goreng"));
    }

    #[test]
    fn test_parse_csv_missing_header() {
        let result = parse_csv("Title,Steps\nA,B\n");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Missing required header: 'Ingredients'"));
    }

    #[test]
    fn test_dataset_source_parse() {
        assert!(matches!(
            DatasetSource::parse("https://example.com/recipes.csv"),
            Ok(DatasetSource::Url(_))
        ));
        assert!(matches!(
            DatasetSource::parse("./data/recipes.csv"),
            Ok(DatasetSource::Path(_))
        ));
        assert!(DatasetSource::parse("ftp://example.com/recipes.csv").is_err());
    }

    #[tokio::test]
    async fn test_load_table_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes.csv")
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body("Title,Ingredients,Steps\nTahu Bacem,tahu,Rebus lalu goreng.\n")
            .create_async()
            .await;

        let config = DatasetConfig {
            source: format!("{}/recipes.csv", server.url()),
            fetch_timeout_seconds: 5,
            user_agent: "test".to_string(),
        };
        let (table, report) = load_table(&config).await.unwrap();

        mock.assert_async().await;
        assert_eq!(report.kept, 1);
        assert_eq!(table.get(0).map(Recipe::title), Some("Tahu Bacem"));
    }

    #[tokio::test]
    async fn test_load_table_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.csv")
            .with_status(404)
            .create_async()
            .await;

        let config = DatasetConfig {
            source: format!("{}/missing.csv", server.url()),
            fetch_timeout_seconds: 5,
            user_agent: "test".to_string(),
        };

        let result = load_table(&config).await;
        assert!(matches!(result, Err(Error::Dataset(_))));
    }
}
