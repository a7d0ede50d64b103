use super::de;
use serde::{Deserialize, Serialize};

/// Pattern tags the suspect list knows how to toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternTag {
    Circular,
    Smurfing,
}

impl PatternTag {
    pub const ALL: [PatternTag; 2] = [PatternTag::Circular, PatternTag::Smurfing];

    pub fn as_str(self) -> &'static str {
        match self {
            PatternTag::Circular => "Circular",
            PatternTag::Smurfing => "Smurfing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PatternTag::Circular => "Circular Routing",
            PatternTag::Smurfing => "Smurfing Patterns",
        }
    }
}

/// Entry of `/investigation/suspects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suspect {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub score: f64,
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub nodes: u64,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub patterns: Vec<String>,
}

impl Suspect {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score: 0.0,
            cluster: None,
            nodes: 0,
            patterns: Vec::new(),
        }
    }

    pub fn with_patterns(mut self, tags: &[PatternTag]) -> Self {
        self.patterns = tags.iter().map(|t| t.as_str().to_string()).collect();
        self
    }

    pub fn has_pattern(&self, tag: PatternTag) -> bool {
        self.patterns.iter().any(|p| p == tag.as_str())
    }

    /// True when none of the tracked tags is present.
    pub fn is_uncategorized(&self) -> bool {
        !PatternTag::ALL.iter().any(|&tag| self.has_pattern(tag))
    }
}
