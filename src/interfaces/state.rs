use crate::application::{CaseGenerationUseCase, SessionStore};
use crate::domain::generation::Difficulty;
use crate::interfaces::http::LogEntry;
use std::sync::{Arc, Mutex};

pub struct AppState {
    pub store: Arc<SessionStore>,
    pub case_generation: CaseGenerationUseCase,
    pub default_difficulty: Difficulty,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}
