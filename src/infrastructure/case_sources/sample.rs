use super::{CaseSource, BATCH_SIZE};
use crate::domain::generation::Difficulty;
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

pub const SAMPLE_CASES: [&str; 8] = [
    // typo: საქარტველო
    "მე მიყვარს საქარტველო.",
    // misplaced comma
    "დღეს კარგი ამინდია მაგრამ, წვიმს.",
    // correct, false positive check
    "მასწავლებელმა მოსწავლეს წიგნი აჩუქა.",
    // typo: თბილიშში
    "ჩემი მეგობარი თბილიშში ცხოვრობს.",
    "რომელი საათია ახლა?",
    "ისინი მიდიან სახლში.",
    "გუშინ ვნახე საინტერესო ფილმი.",
    // typo: მნიშვნეოვანი
    "ეს არის ძალიან მნიშვნეოვანი საკითხი.",
];

/// Hardcoded sentences for manual QA without a model.
pub struct SampleCaseSource {
    delay: Duration,
}

impl SampleCaseSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CaseSource for SampleCaseSource {
    async fn fetch_candidate_cases(&self, _difficulty: Difficulty) -> Vec<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        // Random v4 ids as sort keys give a fresh permutation per call.
        let mut shuffled: Vec<(Uuid, &str)> = SAMPLE_CASES
            .iter()
            .map(|text| (Uuid::new_v4(), *text))
            .collect();
        shuffled.sort_by_key(|(key, _)| *key);

        shuffled
            .into_iter()
            .take(BATCH_SIZE)
            .map(|(_, text)| text.to_string())
            .collect()
    }
}
