pub mod case_generation;
pub mod session_store;
