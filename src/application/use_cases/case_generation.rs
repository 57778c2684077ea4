use crate::application::use_cases::session_store::SessionStore;
use crate::domain::generation::{Difficulty, GenerationOutcome};
use crate::domain::test_case::CasePayload;
use crate::infrastructure::case_sources::CaseSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Clears the in-flight flag when dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Fills the active checklist from a [`CaseSource`], one batch at a time.
pub struct CaseGenerationUseCase {
    store: Arc<SessionStore>,
    source: Arc<dyn CaseSource + Send + Sync>,
    in_flight: AtomicBool,
}

impl CaseGenerationUseCase {
    pub fn new(store: Arc<SessionStore>, source: Arc<dyn CaseSource + Send + Sync>) -> Self {
        Self {
            store,
            source,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Cases land on the platform that was active when the call started, even
    /// if the selection changes while the source is working.
    pub async fn generate(&self, difficulty: Difficulty) -> GenerationOutcome {
        let Some(platform) = self.store.active_platform() else {
            return GenerationOutcome::NoActiveSession;
        };
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!(platform = %platform, "Generation already in progress");
            return GenerationOutcome::Busy;
        };

        let cases = self.source.fetch_candidate_cases(difficulty).await;
        let added = cases.len();
        self.store
            .add_test_cases(Some(platform), cases.into_iter().map(CasePayload::Generated));

        info!(
            platform = %platform,
            difficulty = %difficulty,
            added,
            "Added generated test cases"
        );
        GenerationOutcome::Added { platform, added }
    }
}
