//! Utterance intent classification results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The coarse category assigned to a user utterance.
///
/// The classifier validates model output against this closed set; anything
/// unrecognized (or any provider failure) degrades to [`Intent::Test`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// The user wants to change device state.
    Control,
    /// A general question.
    Question,
    /// A weather query.
    Weather,
    /// An explicit request to rebuild the retrieval index.
    RebuildDatabase,
    /// Diagnostic / unclassifiable input.
    Test,
}

impl Intent {
    /// Parse a classifier answer. Case-insensitive, whitespace-tolerant.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "control" => Some(Self::Control),
            "question" => Some(Self::Question),
            "weather" => Some(Self::Weather),
            "rebuild_database" => Some(Self::RebuildDatabase),
            "test" => Some(Self::Test),
            _ => None,
        }
    }

    /// The lowercase wire form of this intent.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Question => "question",
            Self::Weather => "weather",
            Self::RebuildDatabase => "rebuild_database",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
