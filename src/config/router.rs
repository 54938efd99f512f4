use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Vocabulary and limits used by the query router
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,
    /// Cooking verbs, tested in this order
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    #[serde(default = "default_easy_terms")]
    pub easy_terms: Vec<String>,
    /// Difficulty labels that count as easy when a recipe carries one
    #[serde(default = "default_easy_labels")]
    pub easy_labels: Vec<String>,
    #[serde(default = "default_easy_steps_threshold")]
    pub easy_steps_threshold: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,
    #[serde(default = "default_fallback_sample_size")]
    pub fallback_sample_size: usize,
    #[serde(default = "default_offline_suggestions")]
    pub offline_suggestions: usize,
    #[serde(default)]
    pub fallback_strategy: FallbackStrategy,
}

/// How the fallback picks its reference rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    /// Rows matching any query keyword, topped up at random
    #[default]
    Keyword,
    /// Uniformly random rows
    Random,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn default_stopwords() -> Vec<String> {
    words(&[
        "masakan",
        "apa",
        "saja",
        "yang",
        "bisa",
        "dibuat",
        "dari",
        "menggunakan",
        "bahan",
        "resep",
        "dan",
        "atau",
        "dengan",
        "untuk",
        "mau",
        "ingin",
        "cara",
        "masak",
        "memasak",
        "dimasak",
    ])
}

fn default_methods() -> Vec<String> {
    words(&["goreng", "rebus", "panggang", "kukus"])
}

fn default_easy_terms() -> Vec<String> {
    words(&["mudah", "pemula", "gampang", "easy", "beginner"])
}

fn default_easy_labels() -> Vec<String> {
    words(&["mudah", "easy"])
}

fn default_easy_steps_threshold() -> usize {
    300
}

fn default_max_results() -> usize {
    5
}

fn default_min_keyword_len() -> usize {
    3
}

fn default_fallback_sample_size() -> usize {
    5
}

fn default_offline_suggestions() -> usize {
    3
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            stopwords: default_stopwords(),
            methods: default_methods(),
            easy_terms: default_easy_terms(),
            easy_labels: default_easy_labels(),
            easy_steps_threshold: default_easy_steps_threshold(),
            max_results: default_max_results(),
            min_keyword_len: default_min_keyword_len(),
            fallback_sample_size: default_fallback_sample_size(),
            offline_suggestions: default_offline_suggestions(),
            fallback_strategy: FallbackStrategy::default(),
        }
    }
}

impl RouterConfig {
    /// Load router configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read router config from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: RouterConfig = serde_yaml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse router config from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.methods.is_empty() {
            return Err(Error::Config(
                "Method vocabulary cannot be empty".to_string(),
            ));
        }

        if self.max_results == 0 {
            return Err(Error::Config("max_results must be non-zero".to_string()));
        }

        if self.fallback_sample_size == 0 {
            return Err(Error::Config(
                "fallback_sample_size must be non-zero".to_string(),
            ));
        }

        // Vocabulary is compared against normalized text, so it must be normalized too
        let vocab = self
            .stopwords
            .iter()
            .chain(&self.methods)
            .chain(&self.easy_terms)
            .chain(&self.easy_labels);
        for word in vocab {
            if word.is_empty()
                || !word
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ')
            {
                return Err(Error::Config(format!(
                    "Vocabulary entry '{word}' must be lowercase ASCII letters or digits"
                )));
            }
        }

        let mut seen = HashSet::new();
        for method in &self.methods {
            if !seen.insert(method) {
                return Err(Error::Config(format!("Duplicate method: {method}")));
            }
        }

        Ok(())
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.iter().any(|s| s == word)
    }

    pub fn is_easy_term(&self, word: &str) -> bool {
        self.easy_terms.iter().any(|s| s == word)
    }

    /// Whether a token is or inflects a cooking verb ("goreng", "digoreng")
    pub fn mentions_method(&self, word: &str) -> bool {
        self.methods.iter().any(|m| word.contains(m.as_str()))
    }
}
