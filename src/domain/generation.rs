use crate::domain::error::AppError;
use crate::domain::platform_session::PlatformType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Simple,
    #[default]
    Complex,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Simple => "simple",
            Difficulty::Complex => "complex",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Difficulty::Simple),
            "complex" => Ok(Difficulty::Complex),
            other => Err(AppError::ValidationError(format!(
                "Unknown difficulty: {}",
                other
            ))),
        }
    }
}

/// Result of one "generate" trigger.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum GenerationOutcome {
    NoActiveSession,
    Busy,
    #[serde(rename_all = "camelCase")]
    Added {
        platform: PlatformType,
        added: usize,
    },
}
