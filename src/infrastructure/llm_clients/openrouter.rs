use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, ResponseFormat};
use async_trait::async_trait;
use serde_json::json;

const STRING_ARRAY_INSTRUCTION: &str =
    "Respond with a JSON array of strings only. Do not wrap it in an object or add commentary.";

/// OpenAI-compatible chat completions client (OpenRouter and friends).
pub struct OpenRouterClient {
    client: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    fn api_key(config: &LLMConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::LLMError("Missing API key for OpenRouter".to_string()))
    }

    fn build_body(
        config: &LLMConfig,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> serde_json::Value {
        // Chat endpoints only constrain to JSON objects, so the array shape is
        // requested through the system message instead.
        let system = match format {
            ResponseFormat::Text => system.to_string(),
            ResponseFormat::StringArray if system.trim().is_empty() => {
                STRING_ARRAY_INSTRUCTION.to_string()
            }
            ResponseFormat::StringArray => format!("{}\n\n{}", system, STRING_ARRAY_INSTRUCTION),
        };

        json!({
            "model": config.model,
            "messages": [
                {
                    "role": "system",
                    "content": system
                },
                {
                    "role": "user",
                    "content": user
                }
            ],
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
        })
    }
}

impl Default for OpenRouterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for OpenRouterClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let url = if config.base_url.ends_with('/') {
            format!("{}chat/completions", config.base_url)
        } else {
            format!("{}/chat/completions", config.base_url)
        };
        let body = Self::build_body(config, system, user, format);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::LLMError("Invalid response format".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::LLMProvider;

    fn config() -> LLMConfig {
        LLMConfig {
            provider: LLMProvider::OpenRouter,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            ..LLMConfig::default()
        }
    }

    #[test]
    fn test_array_format_adds_instruction() {
        let body =
            OpenRouterClient::build_body(&config(), "", "Generate", ResponseFormat::StringArray);
        assert_eq!(body["messages"][0]["content"], STRING_ARRAY_INSTRUCTION);
        assert_eq!(body["messages"][1]["content"], "Generate");
        assert_eq!(body["model"], "google/gemini-2.5-flash");
    }

    #[test]
    fn test_text_format_keeps_system_prompt() {
        let body = OpenRouterClient::build_body(&config(), "Be terse", "Hi", ResponseFormat::Text);
        assert_eq!(body["messages"][0]["content"], "Be terse");
    }
}
