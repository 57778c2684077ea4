use crate::domain::error::Result;
use crate::domain::generation::Difficulty;
use crate::domain::llm_config::LLMConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_FILE: &str = "qa_tracker.toml";
pub const ENV_PREFIX: &str = "QA_TRACKER_";
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `qa_tracker_lib=debug`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseSourceKind {
    Sample,
    Generative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSourceConfig {
    pub kind: CaseSourceKind,
    pub difficulty: Difficulty,
    pub sample_delay_ms: u64,
}

impl CaseSourceConfig {
    pub fn sample_delay(&self) -> Duration {
        Duration::from_millis(self.sample_delay_ms)
    }
}

impl Default for CaseSourceConfig {
    fn default() -> Self {
        Self {
            kind: CaseSourceKind::Sample,
            difficulty: Difficulty::Complex,
            sample_delay_ms: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub case_source: CaseSourceConfig,
    pub llm: LLMConfig,
    pub seed_file: Option<PathBuf>,
}

pub struct ConfigService;

impl ConfigService {
    /// Defaults, then `qa_tracker.toml`, then `QA_TRACKER_*` variables
    /// (`__` separates nested keys). A `.env` file is read first if present.
    pub fn load() -> Result<AppConfig> {
        let _ = dotenvy::dotenv();

        let figment = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let fallback_key = API_KEY_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok());
        Self::extract(figment, fallback_key)
    }

    pub fn extract(figment: Figment, fallback_api_key: Option<String>) -> Result<AppConfig> {
        let mut config: AppConfig = figment.extract()?;

        let has_key = config
            .llm
            .api_key
            .as_ref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false);
        if !has_key {
            config.llm.api_key = fallback_api_key.filter(|key| !key.trim().is_empty());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::LLMProvider;

    fn base() -> Figment {
        Figment::new().merge(Serialized::defaults(AppConfig::default()))
    }

    #[test]
    fn test_defaults() {
        let config = ConfigService::extract(base(), None).unwrap();
        assert_eq!(config.http.port, 3001);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.case_source.kind, CaseSourceKind::Sample);
        assert_eq!(config.case_source.sample_delay(), Duration::from_millis(600));
        assert_eq!(config.llm.provider, LLMProvider::Gemini);
        assert!(config.llm.api_key.is_none());
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn test_toml_overrides_nested_keys() {
        let figment = base().merge(Toml::string(
            r#"
            seed_file = "seed.json"

            [http]
            port = 8080

            [case_source]
            kind = "generative"
            difficulty = "simple"

            [llm]
            provider = "OpenRouter"
            model = "google/gemini-2.5-flash"
            "#,
        ));

        let config = ConfigService::extract(figment, None).unwrap();
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.case_source.kind, CaseSourceKind::Generative);
        assert_eq!(config.case_source.difficulty, Difficulty::Simple);
        assert_eq!(config.llm.provider, LLMProvider::OpenRouter);
        assert_eq!(config.llm.model, "google/gemini-2.5-flash");
        assert_eq!(config.seed_file, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn test_fallback_api_key_only_fills_gaps() {
        let config = ConfigService::extract(base(), Some("from-env".to_string())).unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("from-env"));

        let figment = base().merge(Toml::string("[llm]\napi_key = \"from-file\""));
        let config = ConfigService::extract(figment, Some("from-env".to_string())).unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        let figment = base().merge(Toml::string("[http]\nport = \"not a port\""));
        let err = ConfigService::extract(figment, None).unwrap_err();
        assert!(matches!(err, crate::domain::error::AppError::ConfigError(_)));
    }
}
