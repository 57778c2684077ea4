pub mod generative;
pub mod sample;

use crate::domain::generation::Difficulty;
use async_trait::async_trait;

pub use generative::GenerativeCaseSource;
pub use sample::SampleCaseSource;

pub const BATCH_SIZE: usize = 5;

/// Returned in place of an error whenever a source fails internally.
pub const FALLBACK_CASES: [&str; 2] = ["ვერ მოხერხდა ტესტების გენერირება.", "სცადეთ თავიდან."];

pub fn fallback_cases() -> Vec<String> {
    FALLBACK_CASES.iter().map(|text| text.to_string()).collect()
}

/// Supplies candidate test case text.
///
/// Implementations never fail: internal errors are logged and answered with
/// [`FALLBACK_CASES`]. Batches are neither ordered nor repeatable.
#[async_trait]
pub trait CaseSource {
    async fn fetch_candidate_cases(&self, difficulty: Difficulty) -> Vec<String>;
}
