pub mod use_cases;

pub use use_cases::case_generation::CaseGenerationUseCase;
pub use use_cases::session_store::{SessionSnapshot, SessionStore};
