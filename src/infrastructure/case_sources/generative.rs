use super::{fallback_cases, CaseSource, BATCH_SIZE};
use crate::domain::error::Result;
use crate::domain::generation::Difficulty;
use crate::domain::llm_config::{LLMConfig, ResponseFormat};
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::parse_string_array;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

pub fn build_generation_prompt(difficulty: Difficulty) -> String {
    format!(
        "Generate {count} distinct Georgian sentences that contain common spelling or grammatical errors specifically to test a spellchecker (Enagram).\n\
         The difficulty level is: {difficulty}.\n\n\
         For each sentence, include a word with an intentional typo or a grammatical mistake common for Georgian speakers.\n\
         Do not include the translation or explanation, just the raw Georgian text with errors.\n\
         Return the result as a JSON array of strings.",
        count = BATCH_SIZE,
        difficulty = difficulty,
    )
}

/// Asks a hosted model for fresh sentences.
pub struct GenerativeCaseSource {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
}

impl GenerativeCaseSource {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>, config: LLMConfig) -> Self {
        Self { llm_client, config }
    }

    async fn try_fetch(&self, difficulty: Difficulty) -> Result<Vec<String>> {
        let prompt = build_generation_prompt(difficulty);
        let raw_output = self
            .llm_client
            .generate(&self.config, "", &prompt, ResponseFormat::StringArray)
            .await?;
        let mut cases = parse_string_array(&raw_output)?;
        if cases.len() > BATCH_SIZE {
            debug!(returned = cases.len(), "Model returned more cases than requested");
            cases.truncate(BATCH_SIZE);
        }
        Ok(cases)
    }
}

#[async_trait]
impl CaseSource for GenerativeCaseSource {
    async fn fetch_candidate_cases(&self, difficulty: Difficulty) -> Vec<String> {
        match self.try_fetch(difficulty).await {
            Ok(cases) => {
                debug!(
                    model = %self.config.model,
                    difficulty = %difficulty,
                    count = cases.len(),
                    "Generated candidate cases"
                );
                cases
            }
            Err(err) => {
                warn!(
                    error = %err,
                    model = %self.config.model,
                    "Error generating test cases, using fallback"
                );
                fallback_cases()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::infrastructure::case_sources::FALLBACK_CASES;
    use std::sync::Mutex;

    struct StubClient {
        reply: Result<String>,
        seen: Mutex<Vec<(String, ResponseFormat)>>,
    }

    impl StubClient {
        fn new(reply: Result<String>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LLMClient for StubClient {
        async fn generate(
            &self,
            _config: &LLMConfig,
            _system: &str,
            user: &str,
            format: ResponseFormat,
        ) -> Result<String> {
            self.seen.lock().unwrap().push((user.to_string(), format));
            self.reply.clone()
        }
    }

    #[test]
    fn test_prompt_mentions_difficulty_and_shape() {
        let prompt = build_generation_prompt(Difficulty::Simple);
        assert!(prompt.contains("The difficulty level is: simple."));
        assert!(prompt.contains("Generate 5 distinct Georgian sentences"));
        assert!(prompt.contains("JSON array of strings"));
    }

    #[tokio::test]
    async fn test_parses_model_output() {
        let client = StubClient::new(Ok(r#"["ა", "ბ", "გ"]"#.to_string()));
        let source = GenerativeCaseSource::new(client.clone(), LLMConfig::default());

        let cases = source.fetch_candidate_cases(Difficulty::Complex).await;
        assert_eq!(cases, vec!["ა", "ბ", "გ"]);

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, ResponseFormat::StringArray);
        assert!(seen[0].0.contains("complex"));
    }

    #[tokio::test]
    async fn test_oversized_reply_is_capped_to_batch_size() {
        let reply = serde_json::to_string(
            &(0..40).map(|i| format!("წინადადება {}", i)).collect::<Vec<_>>(),
        )
        .unwrap();
        let client = StubClient::new(Ok(reply));
        let source = GenerativeCaseSource::new(client, LLMConfig::default());

        let cases = source.fetch_candidate_cases(Difficulty::Complex).await;
        assert_eq!(cases.len(), BATCH_SIZE);
        assert_eq!(cases[0], "წინადადება 0");
        assert_eq!(cases[BATCH_SIZE - 1], "წინადადება 4");
    }

    #[tokio::test]
    async fn test_client_error_yields_fallback() {
        let client = StubClient::new(Err(AppError::LLMError("quota".to_string())));
        let source = GenerativeCaseSource::new(client, LLMConfig::default());

        let cases = source.fetch_candidate_cases(Difficulty::Complex).await;
        assert_eq!(cases, FALLBACK_CASES.to_vec());
    }

    #[tokio::test]
    async fn test_malformed_output_yields_fallback() {
        let client = StubClient::new(Ok("not json at all".to_string()));
        let source = GenerativeCaseSource::new(client, LLMConfig::default());

        assert_eq!(
            source.fetch_candidate_cases(Difficulty::Simple).await.len(),
            FALLBACK_CASES.len()
        );
    }

    #[tokio::test]
    async fn test_empty_output_is_empty_batch() {
        let client = StubClient::new(Ok(String::new()));
        let source = GenerativeCaseSource::new(client, LLMConfig::default());

        assert!(source
            .fetch_candidate_cases(Difficulty::Simple)
            .await
            .is_empty());
    }
}
