use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::llm::TextGenerator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

// --- Gemini request and response structures ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    #[serde(default)]
    text: String,
}

/// Google Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    temperature: f32,
}

// Keep the key out of Debug output
impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("endpoint", &self.endpoint)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("Gemini API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(Error::Http)?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint,
            api_key,
            temperature: config.temperature,
        })
    }

    /// Build a provider when the configuration carries an API key
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        match &config.api_key {
            Some(key) => Self::new(config, key.clone()).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Calling Gemini ({} prompt chars)", prompt.chars().count());

        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("HTTP {status}: {error_text}")));
        }

        let body: GenerateResponse = response.json().await?;

        let text = body
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .concat();

        if text.trim().is_empty() {
            return Err(Error::Llm("Gemini returned no text".to_string()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config(api_url: String) -> LlmConfig {
        LlmConfig {
            api_key: Some("test-key".to_string()),
            api_url,
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.5,
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"parts": [{"text": "Apa itu rendang?"}]}],
                "generationConfig": {"temperature": 0.5}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{"content": {"parts": [{"text": "Rendang adalah "}, {"text": "masakan Padang."}]}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = GeminiProvider::from_config(&config(server.url()))
            .unwrap()
            .unwrap();
        let text = provider.generate("Apa itu rendang?").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Rendang adalah masakan Padang.");
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let provider = GeminiProvider::from_config(&config(server.url()))
            .unwrap()
            .unwrap();
        let err = provider.generate("halo").await.unwrap_err();

        assert!(matches!(err, Error::Llm(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_generate_empty_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let provider = GeminiProvider::from_config(&config(server.url()))
            .unwrap()
            .unwrap();
        let err = provider.generate("halo").await.unwrap_err();

        assert!(matches!(err, Error::Llm(_)));
    }

    #[test]
    fn test_from_config_without_key() {
        let mut cfg = config("http://localhost".to_string());
        cfg.api_key = None;
        assert!(GeminiProvider::from_config(&cfg).unwrap().is_none());
    }

    #[test]
    fn test_debug_hides_key() {
        let provider = GeminiProvider::from_config(&config("http://localhost".to_string()))
            .unwrap()
            .unwrap();
        assert!(!format!("{provider:?}").contains("test-key"));
    }
}
