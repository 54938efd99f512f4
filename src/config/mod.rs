pub mod router;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use router::{FallbackStrategy, RouterConfig};

/// Public Indonesian recipe CSV used when DATASET_SOURCE is unset
pub const DEFAULT_DATASET_SOURCE: &str =
    "https://raw.githubusercontent.com/valengrcla/celerates/refs/heads/main/Indonesian_Food_Recipes.csv";

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound for API_RATE_LIMIT; the burst size is twice this and must fit a u32
pub const MAX_API_RATE_LIMIT: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub dataset: DatasetConfig,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub router_config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Filesystem path or http(s) URL of the recipe CSV
    pub source: String,
    pub fetch_timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_rate_limit: u64,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let source = std::env::var("DATASET_SOURCE")
            .unwrap_or_else(|_| DEFAULT_DATASET_SOURCE.to_string());

        let fetch_timeout_seconds = std::env::var("DATASET_FETCH_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid DATASET_FETCH_TIMEOUT value".to_string()))?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PORT value".to_string()))?;

        let api_rate_limit = std::env::var("API_RATE_LIMIT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid API_RATE_LIMIT value".to_string()))?;

        let max_request_body_size = std::env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| "65536".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid MAX_REQUEST_BODY_SIZE value".to_string()))?;

        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let api_url = std::env::var("GEMINI_API_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string());

        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());

        let temperature = std::env::var("LLM_TEMPERATURE")
            .unwrap_or_else(|_| "0.7".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid LLM_TEMPERATURE value".to_string()))?;

        let timeout_seconds = std::env::var("LLM_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid LLM_TIMEOUT_SECONDS value".to_string()))?;

        let router_config_path = std::env::var("ROUTER_CONFIG_PATH").ok().map(PathBuf::from);

        Ok(Settings {
            dataset: DatasetConfig {
                source,
                fetch_timeout_seconds,
                user_agent: format!("Dapoer/{}", env!("CARGO_PKG_VERSION")),
            },
            server: ServerConfig {
                host,
                port,
                api_rate_limit,
                max_request_body_size,
            },
            llm: LlmConfig {
                api_key,
                api_url,
                model,
                temperature,
                timeout_seconds,
            },
            router_config_path,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.dataset.source.trim().is_empty() {
            return Err(Error::Config("Dataset source must not be empty".to_string()));
        }

        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.server.api_rate_limit > MAX_API_RATE_LIMIT {
            return Err(Error::Config(format!(
                "API rate limit must be at most {MAX_API_RATE_LIMIT}, got {}",
                self.server.api_rate_limit
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config(format!(
                "Temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }

        Ok(())
    }

    /// Load the router vocabulary, falling back to built-in defaults
    pub fn load_router_config(&self) -> Result<RouterConfig> {
        match &self.router_config_path {
            Some(path) => RouterConfig::from_file(path),
            None => Ok(RouterConfig::default()),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        dataset: DatasetConfig {
            source: "tests/fixtures/recipes.csv".to_string(),
            fetch_timeout_seconds: 5,
            user_agent: "test".to_string(),
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_rate_limit: 10,
            max_request_body_size: 65536,
        },
        llm: LlmConfig {
            api_key: None,
            api_url: DEFAULT_GEMINI_API_URL.to_string(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            timeout_seconds: 5,
        },
        router_config_path: None,
    }
}
