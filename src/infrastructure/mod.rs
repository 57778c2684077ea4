pub mod bootstrap;
pub mod case_sources;
pub mod config;
pub mod llm_clients;
pub mod response;
pub mod seed;
