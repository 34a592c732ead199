//! Operation record entity types - the archived outcome of a completed
//! control session, plus the per-sample structures it contains

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// A recorded answer to one checklist item
///
/// Serialized untagged so pass/fail answers are plain JSON booleans and
/// text answers plain strings, matching the persisted collection shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    PassFail(bool),
    Text(String),
}

impl std::fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseValue::PassFail(true) => write!(f, "pass"),
            ResponseValue::PassFail(false) => write!(f, "fail"),
            ResponseValue::Text(s) if s.is_empty() => write!(f, "-"),
            ResponseValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One checklist answer inside a sample scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistResponse {
    /// Checklist item this answers
    pub item_id: EntityId,
    pub value: ResponseValue,
}

/// One inspected sample: scanned label plus answers in checklist order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleScan {
    /// Unique identifier
    pub id: EntityId,

    /// Operator-scanned sample label
    pub label: String,

    /// One response per checklist item, in the exigence's checklist order
    pub responses: Vec<ChecklistResponse>,
}

impl SampleScan {
    pub fn new(label: impl Into<String>, responses: Vec<ChecklistResponse>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Smp),
            label: label.into(),
            responses,
        }
    }
}

/// The immutable archived outcome of one completed control session
///
/// Order number and piece count are denormalized snapshots taken at
/// completion time; the record stays meaningful after the originating
/// order or exigence is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    /// Unique identifier
    pub id: EntityId,

    /// Originating order
    pub order_id: EntityId,

    /// Exigence the checklist came from
    pub exigence_id: EntityId,

    /// Order number snapshot
    pub order_number: String,

    /// Piece count snapshot
    pub piece_count: u32,

    /// Computed sample quota snapshot
    pub required_samples: u32,

    /// Completed samples, in the order they were saved
    pub samples: Vec<SampleScan>,

    /// When the operator scanned the order
    pub started_at: DateTime<Utc>,

    /// When the last sample was saved
    pub completed_at: DateTime<Utc>,
}
