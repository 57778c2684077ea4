use crate::domain::error::AppError;
use crate::domain::test_case::{TestCase, TestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformType {
    #[serde(rename = "Chrome Extension")]
    Chrome,
    #[serde(rename = "Edge Extension")]
    Edge,
    #[serde(rename = "Word Add-in")]
    Word,
    #[serde(rename = "Google Docs Add-on")]
    Docs,
    #[serde(rename = "Enagram.ai Website")]
    Web,
}

impl PlatformType {
    pub const ALL: [PlatformType; 5] = [
        PlatformType::Chrome,
        PlatformType::Edge,
        PlatformType::Word,
        PlatformType::Docs,
        PlatformType::Web,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlatformType::Chrome => "Chrome Extension",
            PlatformType::Edge => "Edge Extension",
            PlatformType::Word => "Word Add-in",
            PlatformType::Docs => "Google Docs Add-on",
            PlatformType::Web => "Enagram.ai Website",
        }
    }

    /// URL-safe identifier used by the HTTP routes.
    pub fn slug(&self) -> &'static str {
        match self {
            PlatformType::Chrome => "chrome",
            PlatformType::Edge => "edge",
            PlatformType::Word => "word",
            PlatformType::Docs => "docs",
            PlatformType::Web => "web",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlatformType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        PlatformType::ALL
            .into_iter()
            .find(|platform| {
                platform.slug().eq_ignore_ascii_case(trimmed)
                    || platform.label().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| AppError::ValidationError(format!("Unknown platform: {}", trimmed)))
    }
}

/// `(passed + failed) / total * 100`; Failed counts as processed.
pub fn compute_progress(passed: usize, failed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (passed + failed) as f64 / total as f64 * 100.0
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSession {
    pub id: PlatformType,
    pub name: String,
    pub icon: String,
    pub progress: f64,
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub last_updated: DateTime<Utc>,
    pub test_cases: Vec<TestCase>,
}

impl PlatformSession {
    pub fn new(
        id: PlatformType,
        name: impl Into<String>,
        icon: impl Into<String>,
        test_cases: Vec<TestCase>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut session = Self {
            id,
            name: name.into(),
            icon: icon.into(),
            progress: 0.0,
            total_tests: 0,
            passed_tests: 0,
            failed_tests: 0,
            last_updated: now,
            test_cases,
        };
        session.recompute_stats();
        session
    }

    fn recompute_stats(&mut self) {
        self.passed_tests = self.count_status(TestStatus::Passed);
        self.failed_tests = self.count_status(TestStatus::Failed);
        self.total_tests = self.test_cases.len();
        self.progress = compute_progress(self.passed_tests, self.failed_tests, self.total_tests);
    }

    pub fn count_status(&self, status: TestStatus) -> usize {
        self.test_cases
            .iter()
            .filter(|case| case.status == status)
            .count()
    }

    pub fn pending_tests(&self) -> usize {
        self.total_tests
            .saturating_sub(self.passed_tests + self.failed_tests)
    }

    pub fn find_case(&self, test_id: &str) -> Option<&TestCase> {
        self.test_cases.iter().find(|case| case.id == test_id)
    }

    /// Returns the session with `test_id` moved to `status`, or `None` when no
    /// case has that id. Only the status field of the matched case changes.
    pub fn with_status(
        &self,
        test_id: &str,
        status: TestStatus,
        now: DateTime<Utc>,
    ) -> Option<PlatformSession> {
        let index = self.test_cases.iter().position(|case| case.id == test_id)?;

        let mut next = self.clone();
        next.test_cases[index].status = status;
        next.recompute_stats();
        next.last_updated = now;
        Some(next)
    }

    /// Prepends a new case. The case is expected to be Pending, so only the
    /// denominator of `progress` grows.
    pub fn with_new_case(&self, case: TestCase) -> PlatformSession {
        let mut test_cases = Vec::with_capacity(self.test_cases.len() + 1);
        test_cases.push(case);
        test_cases.extend(self.test_cases.iter().cloned());

        let mut next = PlatformSession {
            test_cases,
            ..self.clone()
        };
        next.recompute_stats();
        next
    }

    /// Derived fields agree with `test_cases`.
    pub fn is_consistent(&self) -> bool {
        self.total_tests == self.test_cases.len()
            && self.passed_tests == self.count_status(TestStatus::Passed)
            && self.failed_tests == self.count_status(TestStatus::Failed)
            && self.passed_tests + self.failed_tests <= self.total_tests
            && self.progress
                == compute_progress(self.passed_tests, self.failed_tests, self.total_tests)
    }
}

/// Seed entry; derived fields are never read from seed data.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionSeed {
    pub id: PlatformType,
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl SessionSeed {
    pub fn into_session(self, now: DateTime<Utc>) -> PlatformSession {
        PlatformSession::new(self.id, self.name, self.icon, self.test_cases, now)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::domain::test_case::{CasePayload, TestCategory};
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        SetStatus { slot: usize, status: TestStatus },
        SetUnknown { status: TestStatus },
        Add { text: String, generated: bool },
    }

    fn status() -> impl Strategy<Value = TestStatus> {
        prop_oneof![
            Just(TestStatus::Pending),
            Just(TestStatus::Passed),
            Just(TestStatus::Failed),
            Just(TestStatus::Blocked),
        ]
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<usize>(), status()).prop_map(|(slot, status)| Op::SetStatus { slot, status }),
            status().prop_map(|status| Op::SetUnknown { status }),
            ("[a-zა-ჰ ]{1,16}", any::<bool>())
                .prop_map(|(text, generated)| Op::Add { text, generated }),
        ]
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn session(statuses: Vec<TestStatus>) -> PlatformSession {
        let test_cases = statuses
            .into_iter()
            .enumerate()
            .map(|(i, status)| TestCase {
                id: format!("t{}", i),
                category: TestCategory::Grammar,
                description: format!("case {}", i),
                expected_result: "ok".to_string(),
                status,
                generated_text: None,
                notes: None,
            })
            .collect();
        PlatformSession::new(PlatformType::Chrome, "Chrome Extension", "chrome", test_cases, at())
    }

    proptest! {
        #[test]
        fn derived_fields_hold_after_any_sequence(
            initial in prop::collection::vec(status(), 0..12),
            ops in prop::collection::vec(op(), 0..24),
        ) {
            let mut current = session(initial);
            prop_assert!(current.is_consistent());

            for op in ops {
                current = match op {
                    Op::SetStatus { slot, status } => {
                        if current.test_cases.is_empty() {
                            continue;
                        }
                        let id = current.test_cases[slot % current.test_cases.len()].id.clone();
                        let next = current.with_status(&id, status, at()).unwrap();
                        prop_assert_eq!(next.find_case(&id).unwrap().status, status);
                        for (before, after) in current.test_cases.iter().zip(&next.test_cases) {
                            if before.id != id {
                                prop_assert_eq!(before, after);
                            }
                        }

                        let again = next.with_status(&id, status, at()).unwrap();
                        prop_assert_eq!(&again, &next);
                        next
                    }
                    Op::SetUnknown { status } => {
                        prop_assert!(current.with_status("missing", status, at()).is_none());
                        current
                    }
                    Op::Add { text, generated } => {
                        let payload = if generated {
                            CasePayload::Generated(text)
                        } else {
                            CasePayload::Manual(text)
                        };
                        let case = payload.into_test_case();
                        let id = case.id.clone();
                        let next = current.with_new_case(case);

                        prop_assert_eq!(&next.test_cases[0].id, &id);
                        prop_assert_eq!(next.test_cases[0].status, TestStatus::Pending);
                        prop_assert_eq!(&next.test_cases[1..], &current.test_cases[..]);
                        prop_assert_eq!(next.passed_tests, current.passed_tests);
                        prop_assert_eq!(next.failed_tests, current.failed_tests);
                        prop_assert_eq!(next.total_tests, current.total_tests + 1);
                        next
                    }
                };
                prop_assert!(current.is_consistent());
            }
        }
    }
}
