//! Exigence entity type - a quality requirement bundling a sampling rule
//! and an ordered checklist

use serde::{Deserialize, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// How an operator answers a checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ChecklistItemKind {
    /// Pass/fail verdict (required before a sample can be saved)
    #[default]
    PassFail,
    /// Free-text remark (always optional)
    Text,
}

impl std::fmt::Display for ChecklistItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecklistItemKind::PassFail => write!(f, "pass/fail"),
            ChecklistItemKind::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for ChecklistItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passfail" | "pass/fail" | "pass-fail" => Ok(ChecklistItemKind::PassFail),
            "text" => Ok(ChecklistItemKind::Text),
            _ => Err(format!("Unknown checklist item kind: {}", s)),
        }
    }
}

/// One control to perform on every sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Unique identifier
    pub id: EntityId,

    /// Short label shown to the operator
    pub label: String,

    /// Answer kind
    #[serde(rename = "type")]
    pub kind: ChecklistItemKind,

    /// Optional guidance text for the operator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

impl ChecklistItem {
    pub fn new(label: impl Into<String>, kind: ChecklistItemKind) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Itm),
            label: label.into(),
            kind,
            guidance: None,
        }
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }
}

/// Parameters controlling how many samples are required per order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRule {
    /// Pieces covered by one sample; a missing or non-positive value
    /// makes the required count fall back to `min_samples` (or 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces_per_sample: Option<u32>,

    /// Lower bound on the required sample count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_samples: Option<u32>,

    /// Upper bound on the required sample count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_samples: Option<u32>,
}

impl SampleRule {
    /// Normalize a rule at entry time: bounds are raised to at least 1 and
    /// `max_samples` is clamped to be >= `min_samples`.
    ///
    /// Applied only when a manager submits the rule, never on read.
    pub fn clamped(mut self) -> Self {
        self.pieces_per_sample = self.pieces_per_sample.map(|p| p.max(1));
        self.min_samples = self.min_samples.map(|m| m.max(1));
        if let Some(max) = self.max_samples {
            self.max_samples = Some(max.max(self.min_samples.unwrap_or(1)));
        }
        self
    }
}

/// A quality requirement: sampling rule plus ordered checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exigence {
    /// Unique identifier
    pub id: EntityId,

    /// Display name
    pub name: String,

    /// Short code (e.g. "STD-CTRL")
    pub code: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sampling rule applied to referencing orders
    pub sample_rule: SampleRule,

    /// Ordered checklist applied to every sample (never empty)
    pub checklist: Vec<ChecklistItem>,
}

impl Exigence {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        sample_rule: SampleRule,
        checklist: Vec<ChecklistItem>,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Exg),
            name: name.into(),
            code: code.into(),
            description: None,
            sample_rule,
            checklist,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
