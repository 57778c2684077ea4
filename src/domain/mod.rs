pub mod dashboard;
pub mod error;
pub mod generation;
pub mod llm_config;
pub mod platform_session;
pub mod test_case;
