pub mod gemini;
pub mod openrouter;

use crate::domain::error::Result;
use crate::domain::llm_config::{LLMConfig, LLMProvider, ResponseFormat};
use async_trait::async_trait;
use gemini::GeminiClient;
use openrouter::OpenRouterClient;

#[async_trait]
pub trait LLMClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String>;
}

pub struct RouterClient {
    gemini: GeminiClient,
    openrouter: OpenRouterClient,
}

impl RouterClient {
    pub fn new() -> Self {
        Self {
            gemini: GeminiClient::new(),
            openrouter: OpenRouterClient::new(),
        }
    }
}

impl Default for RouterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for RouterClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String> {
        match config.provider {
            LLMProvider::Gemini => self.gemini.generate(config, system, user, format).await,
            LLMProvider::OpenRouter => {
                self.openrouter
                    .generate(config, system, user, format)
                    .await
            }
        }
    }
}
