use crate::domain::error::{AppError, Result};
use crate::domain::platform_session::{PlatformType, SessionSeed};
use crate::domain::test_case::{TestCase, TestCategory, TestStatus};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

fn seed_case(
    id: &str,
    category: TestCategory,
    description: &str,
    expected_result: &str,
    status: TestStatus,
) -> TestCase {
    TestCase {
        id: id.to_string(),
        category,
        description: description.to_string(),
        expected_result: expected_result.to_string(),
        status,
        generated_text: None,
        notes: None,
    }
}

/// Built-in checklist used when no seed file is configured.
pub fn default_seed() -> Vec<SessionSeed> {
    use TestCategory::*;
    use TestStatus::*;

    let mut sidebar = seed_case("w1", UiUx, "Sidebar loads correctly", "Sidebar visible", Failed);
    sidebar.notes = Some("Sidebar stuck loading".to_string());

    vec![
        SessionSeed {
            id: PlatformType::Chrome,
            name: "Chrome Extension".to_string(),
            icon: "chrome".to_string(),
            test_cases: vec![
                seed_case("c1", UiUx, "Extension icon appears in toolbar", "Icon visible", Passed),
                seed_case(
                    "c2",
                    Spelling,
                    "Highlight \"გამარჯობა\" (correct)",
                    "No red underline",
                    Pending,
                ),
                seed_case(
                    "c3",
                    Spelling,
                    "Highlight \"გამრჯობა\" (incorrect)",
                    "Red underline shown",
                    Pending,
                ),
            ],
        },
        SessionSeed {
            id: PlatformType::Edge,
            name: "Edge Extension".to_string(),
            icon: "edge".to_string(),
            test_cases: vec![
                seed_case(
                    "e1",
                    Performance,
                    "Check memory usage on large page",
                    "< 100MB",
                    Pending,
                ),
                seed_case("e2", Spelling, "Real-time checking delay", "< 500ms", Pending),
            ],
        },
        SessionSeed {
            id: PlatformType::Word,
            name: "Microsoft Word Add-in".to_string(),
            icon: "file-text".to_string(),
            test_cases: vec![
                sidebar,
                seed_case(
                    "w2",
                    Grammar,
                    "Check context menu suggestions",
                    "Suggestions appear",
                    Pending,
                ),
            ],
        },
        SessionSeed {
            id: PlatformType::Docs,
            name: "Google Docs Add-on".to_string(),
            icon: "file".to_string(),
            test_cases: vec![seed_case(
                "g1",
                Performance,
                "Batch check 50 pages",
                "Completed < 5s",
                Pending,
            )],
        },
        SessionSeed {
            id: PlatformType::Web,
            name: "Enagram.ai Website".to_string(),
            icon: "globe".to_string(),
            test_cases: vec![
                seed_case(
                    "wb1",
                    Spelling,
                    "Input text area accepts Georgian",
                    "Text input works",
                    Passed,
                ),
                seed_case("wb2", UiUx, "Mobile responsiveness", "Layout adapts", Passed),
            ],
        },
    ]
}

/// Reads a JSON array of seed entries.
pub fn load_seed_file(path: &Path) -> Result<Vec<SessionSeed>> {
    let raw = std::fs::read_to_string(path)?;
    let seeds: Vec<SessionSeed> = serde_json::from_str(&raw).map_err(|err| {
        AppError::ParseError(format!("Invalid seed file {}: {}", path.display(), err))
    })?;
    validate_seed(&seeds)?;

    info!(
        seed_file = %path.display(),
        sessions = seeds.len(),
        "Loaded session seed file"
    );
    Ok(seeds)
}

pub fn validate_seed(seeds: &[SessionSeed]) -> Result<()> {
    let mut platforms = HashSet::new();
    for seed in seeds {
        if !platforms.insert(seed.id) {
            return Err(AppError::ValidationError(format!(
                "Platform {} is seeded more than once",
                seed.id
            )));
        }

        let mut case_ids = HashSet::new();
        for case in &seed.test_cases {
            if !case_ids.insert(case.id.as_str()) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate test case id {} in {}",
                    case.id, seed.id
                )));
            }
        }
    }
    Ok(())
}
