// External text generation used by the fallback path

pub mod gemini;

use crate::error::Result;
use async_trait::async_trait;
use std::fmt::Debug;

pub use gemini::GeminiProvider;

/// A text-generation backend: prompt in, generated text out.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
