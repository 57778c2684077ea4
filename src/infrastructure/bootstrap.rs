use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use crate::application::{CaseGenerationUseCase, SessionStore};
use crate::domain::error::Result;
use crate::infrastructure::case_sources::{CaseSource, GenerativeCaseSource, SampleCaseSource};
use crate::infrastructure::config::{AppConfig, CaseSourceKind};
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
use crate::infrastructure::seed::{default_seed, load_seed_file};
use crate::interfaces::http::{add_log, LogEntry};
use crate::interfaces::AppState;

/// Wires the store, the case source and the shared log buffer.
pub fn build_state(config: &AppConfig) -> Result<Arc<AppState>> {
    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));

    let seeds = match &config.seed_file {
        Some(path) => load_seed_file(path).map_err(|err| {
            error!(error = %err, seed_file = %path.display(), "Failed to load seed file");
            err
        })?,
        None => default_seed(),
    };
    let store = Arc::new(SessionStore::new(seeds));

    let source = build_case_source(config);
    add_log(
        &logs,
        "INFO",
        "Bootstrap",
        &format!(
            "Case source ready (kind={:?} model={})",
            config.case_source.kind, config.llm.model
        ),
    );

    Ok(Arc::new(AppState {
        case_generation: CaseGenerationUseCase::new(store.clone(), source),
        store,
        default_difficulty: config.case_source.difficulty,
        logs,
    }))
}

fn build_case_source(config: &AppConfig) -> Arc<dyn CaseSource + Send + Sync> {
    match config.case_source.kind {
        CaseSourceKind::Sample => {
            Arc::new(SampleCaseSource::new(config.case_source.sample_delay()))
        }
        CaseSourceKind::Generative => {
            if config.llm.api_key.is_none() {
                // Still usable: every fetch falls back to the placeholder pair.
                warn!(
                    provider = ?config.llm.provider,
                    "No API key configured for generative case source"
                );
            }
            info!(
                provider = ?config.llm.provider,
                model = %config.llm.model,
                "Using generative case source"
            );
            let client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());
            Arc::new(GenerativeCaseSource::new(client, config.llm.clone()))
        }
    }
}
