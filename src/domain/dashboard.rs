use crate::domain::platform_session::{compute_progress, PlatformSession, PlatformType};
use crate::domain::test_case::TestStatus;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    pub id: PlatformType,
    pub name: String,
    pub icon: String,
    pub progress: f64,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub blocked_tests: usize,
}

/// Aggregate view across all platforms. Pending is everything neither passed
/// nor failed, so blocked cases land there too.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_passed: usize,
    pub total_failed: usize,
    pub total_pending: usize,
    pub total_tests: usize,
    pub overall_progress: f64,
    pub platforms: Vec<PlatformSummary>,
}

impl DashboardSummary {
    pub fn from_sessions(sessions: &[Arc<PlatformSession>]) -> Self {
        let platforms: Vec<PlatformSummary> = sessions
            .iter()
            .map(|session| PlatformSummary {
                id: session.id,
                name: session.name.clone(),
                icon: session.icon.clone(),
                progress: session.progress,
                total_tests: session.total_tests,
                passed_tests: session.passed_tests,
                failed_tests: session.failed_tests,
                blocked_tests: session.count_status(TestStatus::Blocked),
            })
            .collect();

        let total_passed = sessions.iter().map(|s| s.passed_tests).sum();
        let total_failed = sessions.iter().map(|s| s.failed_tests).sum();
        let total_pending = sessions.iter().map(|s| s.pending_tests()).sum();
        let total_tests = sessions.iter().map(|s| s.total_tests).sum();

        Self {
            total_passed,
            total_failed,
            total_pending,
            total_tests,
            overall_progress: compute_progress(total_passed, total_failed, total_tests),
            platforms,
        }
    }
}
