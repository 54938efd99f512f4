use crate::config::Settings;
use crate::dataset::{self, LoadReport};
use crate::llm::GeminiProvider;
use crate::router::{QueryRouter, Tool};
use crate::{chat, Result};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};

/// Load the dataset and vocabulary, and wire the text generator if configured
pub async fn build_router(settings: &Settings) -> Result<(QueryRouter, LoadReport)> {
    let router_config = settings.load_router_config()?;
    router_config.validate()?;

    let (table, report) = dataset::load_table(&settings.dataset).await?;
    let mut router = QueryRouter::new(table, router_config);

    match GeminiProvider::from_config(&settings.llm)? {
        Some(provider) => {
            info!("Fallback uses Gemini model {}", settings.llm.model);
            router = router.with_generator(Arc::new(provider));
        }
        None => {
            warn!("GEMINI_API_KEY not set; fallback will suggest recipes without generation");
        }
    }

    Ok((router, report))
}

/// Answer a single question on stdout
pub async fn ask(settings: &Settings, query: &str) -> Result<()> {
    let (router, _) = build_router(settings).await?;
    let answer = router.answer(query).await;

    println!("{}", answer.text);
    Ok(())
}

/// Interactive chat on stdin/stdout
pub async fn chat(settings: &Settings) -> Result<()> {
    let (router, _) = build_router(settings).await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    chat::run_repl(&router, stdin, stdout).await?;

    Ok(())
}

/// Run one tool and print its answer or not-found message
pub async fn tool(settings: &Settings, tool: Tool, query: &str) -> Result<()> {
    let (router, _) = build_router(settings).await?;
    let outcome = router.run_tool(tool, query);

    println!("{}", outcome.into_text());
    Ok(())
}

/// Print a dataset summary
pub async fn inspect(settings: &Settings) -> Result<()> {
    let (router, report) = build_router(settings).await?;
    let config = router.config();

    let easy = router
        .table()
        .iter()
        .filter(|r| crate::router::tools::is_easy(r, config))
        .count();

    println!("Dataset: {}", settings.dataset.source);
    println!("  Rows read:        {}", report.rows);
    println!("  Recipes kept:     {}", report.kept);
    println!("  Incomplete rows:  {}", report.incomplete);
    println!("  Duplicate rows:   {}", report.duplicates);
    println!("  Easy recipes:     {easy}");
    for method in &config.methods {
        let count = router
            .table()
            .iter()
            .filter(|r| r.steps_normalized().contains(method.as_str()))
            .count();
        println!("  Method '{method}': {count}");
    }
    println!(
        "  Text generator:   {}",
        if router.has_generator() {
            settings.llm.model.as_str()
        } else {
            "none (offline suggestions)"
        }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_build_router_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Title,Ingredients,Steps").unwrap();
        writeln!(file, "Soto Ayam,ayam--kunyit,Rebus ayam.").unwrap();
        file.flush().unwrap();

        let mut settings = crate::config::test_settings();
        settings.dataset.source = file.path().display().to_string();

        let (router, report) = build_router(&settings).await.unwrap();
        assert_eq!(report.kept, 1);
        assert!(!router.has_generator());
        assert!(router.match_rules("soto ayam").is_some());
    }

    #[tokio::test]
    async fn test_build_router_with_key_wires_generator() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Title,Ingredients,Steps").unwrap();
        writeln!(file, "Soto Ayam,ayam,Rebus ayam.").unwrap();
        file.flush().unwrap();

        let mut settings = crate::config::test_settings();
        settings.dataset.source = file.path().display().to_string();
        settings.llm.api_key = Some("key".to_string());

        let (router, _) = build_router(&settings).await.unwrap();
        assert!(router.has_generator());
    }

    #[tokio::test]
    async fn test_build_router_missing_file() {
        let mut settings = crate::config::test_settings();
        settings.dataset.source = "/nonexistent/recipes.csv".to_string();

        assert!(build_router(&settings).await.is_err());
    }
}
