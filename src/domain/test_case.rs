use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MANUAL_EXPECTED_RESULT: &str = "Manual verify";
pub const GENERATED_DESCRIPTION: &str = "AI Generated Case";
pub const GENERATED_EXPECTED_RESULT: &str = "Spellchecker should flag error";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestCategory {
    Spelling,
    Grammar,
    #[serde(rename = "UI/UX")]
    UiUx,
    Performance,
}

/// Every status is reachable from every other one; none is terminal.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    #[default]
    Pending,
    Passed,
    Failed,
    Blocked,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub category: TestCategory,
    pub description: String,
    pub expected_result: String,
    #[serde(default)]
    pub status: TestStatus,
    #[serde(default, alias = "sampleText", skip_serializing_if = "Option::is_none")]
    pub generated_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TestCase {
    /// Creates a Pending case with a fresh id.
    pub fn pending(
        category: TestCategory,
        description: impl Into<String>,
        expected_result: impl Into<String>,
        generated_text: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            category,
            description: description.into(),
            expected_result: expected_result.into(),
            status: TestStatus::Pending,
            generated_text,
            notes: None,
        }
    }

    /// Text shown in the checklist: generated text wins over the description.
    pub fn display_text(&self) -> &str {
        self.generated_text.as_deref().unwrap_or(&self.description)
    }
}

/// Text handed to `add_test_case`, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasePayload {
    Manual(String),
    Generated(String),
}

impl CasePayload {
    pub fn into_test_case(self) -> TestCase {
        match self {
            CasePayload::Manual(text) => {
                TestCase::pending(TestCategory::Spelling, text, MANUAL_EXPECTED_RESULT, None)
            }
            CasePayload::Generated(text) => TestCase::pending(
                TestCategory::Spelling,
                GENERATED_DESCRIPTION,
                GENERATED_EXPECTED_RESULT,
                Some(text),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_payload_uses_description_slot() {
        let case = CasePayload::Manual("Check popup".to_string()).into_test_case();
        assert_eq!(case.description, "Check popup");
        assert_eq!(case.expected_result, MANUAL_EXPECTED_RESULT);
        assert_eq!(case.category, TestCategory::Spelling);
        assert_eq!(case.status, TestStatus::Pending);
        assert!(case.generated_text.is_none());
        assert_eq!(case.display_text(), "Check popup");
    }

    #[test]
    fn test_generated_payload_overrides_display_text() {
        let case = CasePayload::Generated("მე მიყვარს საქარტველო.".to_string()).into_test_case();
        assert_eq!(case.description, GENERATED_DESCRIPTION);
        assert_eq!(case.expected_result, GENERATED_EXPECTED_RESULT);
        assert_eq!(case.display_text(), "მე მიყვარს საქარტველო.");
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = CasePayload::Manual("a".to_string()).into_test_case();
        let b = CasePayload::Manual("a".to_string()).into_test_case();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_wire_format() {
        let mut case = TestCase::pending(TestCategory::UiUx, "Sidebar loads", "Visible", None);
        case.id = "w1".to_string();
        case.status = TestStatus::Blocked;
        let json = serde_json::to_value(&case).unwrap();
        assert_eq!(json["category"], "UI/UX");
        assert_eq!(json["status"], "BLOCKED");
        assert_eq!(json["expectedResult"], "Visible");
        assert!(json.get("generatedText").is_none());

        let parsed: TestCase = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "category": "Performance",
            "description": "Batch check",
            "expectedResult": "Fast"
        }))
        .unwrap();
        assert_eq!(parsed.status, TestStatus::Pending);
    }

    #[test]
    fn test_sample_text_key_is_accepted() {
        let parsed: TestCase = serde_json::from_value(serde_json::json!({
            "id": "c9",
            "category": "Spelling",
            "description": "d",
            "expectedResult": "Red underline shown",
            "sampleText": "გამრჯობა"
        }))
        .unwrap();
        assert_eq!(parsed.generated_text.as_deref(), Some("გამრჯობა"));
        assert_eq!(parsed.display_text(), "გამრჯობა");

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["generatedText"], "გამრჯობა");
    }
}
