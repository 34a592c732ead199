//! Production order entity type

use serde::{Deserialize, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// A production order referencing one exigence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfig {
    /// Unique identifier
    pub id: EntityId,

    /// Human-entered lookup key, matched case-insensitively at scan time
    pub order_number: String,

    /// Referenced exigence; deleting it cascades to this order
    pub exigence_id: EntityId,

    /// Pieces in the order (positive)
    pub piece_count: u32,

    /// Optional internal notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderConfig {
    pub fn new(
        order_number: impl Into<String>,
        piece_count: u32,
        exigence_id: EntityId,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Ord),
            order_number: order_number.into(),
            exigence_id,
            piece_count,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Case-insensitive exact match against a scanned order number
    pub fn matches(&self, scan: &str) -> bool {
        self.order_number.to_lowercase() == scan.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_roundtrip() {
        let order = OrderConfig::new("CMD-1001", 120, EntityId::new(EntityPrefix::Exg))
            .with_notes("Demo order");

        let json = serde_json::to_string(&order).unwrap();
        let parsed: OrderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(order, parsed);
    }

    #[test]
    fn test_matches_ignores_case() {
        let order = OrderConfig::new("CMD-1001", 120, EntityId::new(EntityPrefix::Exg));
        assert!(order.matches("cmd-1001"));
        assert!(order.matches("Cmd-1001"));
        assert!(!order.matches("CMD-1002"));
    }

    #[test]
    fn test_notes_omitted_when_absent() {
        let order = OrderConfig::new("CMD-1", 10, EntityId::new(EntityPrefix::Exg));
        let json = serde_json::to_string(&order).unwrap();
        assert!(!json.contains("notes"));
    }
}
