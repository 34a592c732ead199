//! Operator control session state machine
//!
//! A session starts idle. Scanning an order number resolves the order and
//! its exigence, computes the sample quota, and activates the session.
//! Samples are then saved one by one; reaching the quota finalizes the
//! session into an immutable [`OperationRecord`] and resets it to idle.
//!
//! Scanning again while a session is active silently discards unsaved
//! progress. That mirrors the documented workflow; confirmation belongs to
//! the interaction layer, not the machine.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::registry::Registry;
use crate::core::sampling::required_samples;
use crate::entities::exigence::{ChecklistItemKind, Exigence};
use crate::entities::operation::{
    ChecklistResponse, OperationRecord, ResponseValue, SampleScan,
};
use crate::entities::order::OrderConfig;

/// Failures surfaced to the operator; every one is a no-op on the session
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("scan a non-empty order number")]
    EmptyScan,

    #[error("no order matches \"{0}\"; check the configuration")]
    NoMatchingOrder(String),

    #[error("order {order_number} references no existing exigence; configure its checklist first")]
    MissingExigence { order_number: String },

    #[error("no active control session")]
    NotActive,

    #[error("scan a sample label before saving")]
    EmptyLabel,

    #[error("complete every pass/fail check for the current sample")]
    ChecklistIncomplete,
}

/// Outcome of a successful sample save
#[derive(Debug)]
pub enum SessionProgress {
    /// Sample stored, more required before the session completes
    Sampling { saved: u32, remaining: u32 },
    /// Quota reached; the session finalized into this record and reset
    Completed(OperationRecord),
}

/// An activated session: matched order, resolved exigence and progress
#[derive(Debug, Clone)]
pub struct ActiveControl {
    order: OrderConfig,
    exigence: Exigence,
    required_samples: u32,
    started_at: DateTime<Utc>,
    samples: Vec<SampleScan>,
    responses: HashMap<EntityId, ResponseValue>,
}

impl ActiveControl {
    pub fn order(&self) -> &OrderConfig {
        &self.order
    }

    pub fn exigence(&self) -> &Exigence {
        &self.exigence
    }

    pub fn required_samples(&self) -> u32 {
        self.required_samples
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Samples saved so far in this session
    pub fn samples(&self) -> &[SampleScan] {
        &self.samples
    }

    pub fn remaining(&self) -> u32 {
        self.required_samples
            .saturating_sub(self.samples.len() as u32)
    }

    /// In-progress response for a checklist item, if any
    pub fn response(&self, item_id: &EntityId) -> Option<&ResponseValue> {
        self.responses.get(item_id)
    }

    /// True once every pass/fail item has a boolean response recorded.
    /// Free-text items never gate the save.
    pub fn checklist_ready(&self) -> bool {
        self.exigence.checklist.iter().all(|item| match item.kind {
            ChecklistItemKind::PassFail => matches!(
                self.responses.get(&item.id),
                Some(ResponseValue::PassFail(_))
            ),
            ChecklistItemKind::Text => true,
        })
    }
}

/// The operator session state machine (idle or active)
#[derive(Debug, Default)]
pub struct ControlSession {
    active: Option<ActiveControl>,
}

impl ControlSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveControl> {
        self.active.as_ref()
    }

    /// Scan an order number and activate the session.
    ///
    /// On failure the session keeps its previous state. On success any
    /// previously active session is discarded and progress starts empty.
    pub fn start(
        &mut self,
        scan: &str,
        registry: &Registry,
    ) -> Result<&ActiveControl, SessionError> {
        let cleaned = scan.trim();
        if cleaned.is_empty() {
            return Err(SessionError::EmptyScan);
        }

        let order = registry
            .find_order(cleaned)
            .ok_or_else(|| SessionError::NoMatchingOrder(cleaned.to_string()))?;

        let exigence =
            registry
                .exigence(&order.exigence_id)
                .ok_or_else(|| SessionError::MissingExigence {
                    order_number: order.order_number.clone(),
                })?;

        let required = required_samples(order.piece_count, &exigence.sample_rule);

        Ok(&*self.active.insert(ActiveControl {
            order: order.clone(),
            exigence: exigence.clone(),
            required_samples: required,
            started_at: Utc::now(),
            samples: Vec::new(),
            responses: HashMap::new(),
        }))
    }

    /// Record a response for the current sample; last write wins
    pub fn set_response(
        &mut self,
        item_id: EntityId,
        value: ResponseValue,
    ) -> Result<(), SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NotActive)?;
        active.responses.insert(item_id, value);
        Ok(())
    }

    /// Save the current sample under the given label.
    ///
    /// Requires a non-empty trimmed label and a ready checklist; a failed
    /// save changes nothing. On success the sample is appended and the
    /// in-progress responses cleared. Reaching the quota finalizes the
    /// session into an [`OperationRecord`] and resets to idle.
    pub fn save_sample(&mut self, label: &str) -> Result<SessionProgress, SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NotActive)?;

        let label = label.trim();
        if label.is_empty() {
            return Err(SessionError::EmptyLabel);
        }
        if !active.checklist_ready() {
            return Err(SessionError::ChecklistIncomplete);
        }

        // Pair every checklist item with its response, in checklist order.
        // The gate guarantees pass/fail items are set; the defaults below
        // define the fallback anyway.
        let responses = active
            .exigence
            .checklist
            .iter()
            .map(|item| ChecklistResponse {
                item_id: item.id.clone(),
                value: active.responses.get(&item.id).cloned().unwrap_or_else(|| {
                    match item.kind {
                        ChecklistItemKind::PassFail => ResponseValue::PassFail(false),
                        ChecklistItemKind::Text => ResponseValue::Text(String::new()),
                    }
                }),
            })
            .collect();

        active.samples.push(SampleScan::new(label, responses));
        active.responses.clear();

        let saved = active.samples.len() as u32;
        if saved < active.required_samples {
            return Ok(SessionProgress::Sampling {
                saved,
                remaining: active.required_samples - saved,
            });
        }

        let finished = self.active.take().ok_or(SessionError::NotActive)?;
        Ok(SessionProgress::Completed(OperationRecord {
            id: EntityId::new(EntityPrefix::Op),
            order_id: finished.order.id,
            exigence_id: finished.exigence.id,
            order_number: finished.order.order_number,
            piece_count: finished.order.piece_count,
            required_samples: finished.required_samples,
            samples: finished.samples,
            started_at: finished.started_at,
            completed_at: Utc::now(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::{ExigencePayload, OrderPayload};
    use crate::entities::exigence::{ChecklistItem, SampleRule};

    /// Registry with the reference scenario: CMD-1001, 120 pieces,
    /// rule {30, min 1, max 10}, two pass/fail items and one text item.
    fn reference_registry() -> (Registry, Vec<ChecklistItem>) {
        let checklist = vec![
            ChecklistItem::new("Visual state", ChecklistItemKind::PassFail),
            ChecklistItem::new("Dimensions checked", ChecklistItemKind::PassFail),
            ChecklistItem::new("Remark", ChecklistItemKind::Text),
        ];

        let mut registry = Registry::default();
        let exg_id = registry.upsert_exigence(ExigencePayload {
            id: None,
            name: "Standard control".to_string(),
            code: "STD-CTRL".to_string(),
            description: None,
            sample_rule: SampleRule {
                pieces_per_sample: Some(30),
                min_samples: Some(1),
                max_samples: Some(10),
            },
            checklist: checklist.clone(),
        });
        registry.upsert_order(OrderPayload {
            id: None,
            order_number: "CMD-1001".to_string(),
            exigence_id: exg_id,
            piece_count: 120,
            notes: None,
        });

        (registry, checklist)
    }

    fn answer_all(session: &mut ControlSession, checklist: &[ChecklistItem]) {
        for item in checklist {
            let value = match item.kind {
                ChecklistItemKind::PassFail => ResponseValue::PassFail(true),
                ChecklistItemKind::Text => ResponseValue::Text("ok".to_string()),
            };
            session.set_response(item.id.clone(), value).unwrap();
        }
    }

    #[test]
    fn test_empty_scan_rejected() {
        let (registry, _) = reference_registry();
        let mut session = ControlSession::new();
        assert_eq!(
            session.start("   ", &registry).unwrap_err(),
            SessionError::EmptyScan
        );
        assert!(!session.is_active());
    }

    #[test]
    fn test_unknown_order_echoes_input() {
        let (registry, _) = reference_registry();
        let mut session = ControlSession::new();
        assert_eq!(
            session.start("CMD-9999", &registry).unwrap_err(),
            SessionError::NoMatchingOrder("CMD-9999".to_string())
        );
        assert!(!session.is_active());
    }

    #[test]
    fn test_scan_matches_case_insensitively() {
        let (registry, _) = reference_registry();
        let mut session = ControlSession::new();
        let active = session.start("cmd-1001", &registry).unwrap();
        assert_eq!(active.order().order_number, "CMD-1001");
        assert_eq!(active.required_samples(), 4);
    }

    #[test]
    fn test_dangling_exigence_reference() {
        let (mut registry, _) = reference_registry();
        registry.upsert_order(OrderPayload {
            id: None,
            order_number: "CMD-2002".to_string(),
            exigence_id: EntityId::new(EntityPrefix::Exg),
            piece_count: 50,
            notes: None,
        });

        let mut session = ControlSession::new();
        assert_eq!(
            session.start("CMD-2002", &registry).unwrap_err(),
            SessionError::MissingExigence {
                order_number: "CMD-2002".to_string()
            }
        );
        assert!(!session.is_active());
    }

    #[test]
    fn test_save_requires_label() {
        let (registry, checklist) = reference_registry();
        let mut session = ControlSession::new();
        session.start("CMD-1001", &registry).unwrap();
        answer_all(&mut session, &checklist);

        assert_eq!(
            session.save_sample("  ").unwrap_err(),
            SessionError::EmptyLabel
        );
        assert!(session.active().unwrap().samples().is_empty());
    }

    #[test]
    fn test_incomplete_checklist_rejected_without_state_change() {
        let (registry, checklist) = reference_registry();
        let mut session = ControlSession::new();
        session.start("CMD-1001", &registry).unwrap();

        // Only one of the two pass/fail items answered
        session
            .set_response(checklist[0].id.clone(), ResponseValue::PassFail(true))
            .unwrap();

        assert_eq!(
            session.save_sample("S-1").unwrap_err(),
            SessionError::ChecklistIncomplete
        );
        assert!(session.active().unwrap().samples().is_empty());
        // The recorded response survives the rejection
        assert_eq!(
            session.active().unwrap().response(&checklist[0].id),
            Some(&ResponseValue::PassFail(true))
        );
    }

    #[test]
    fn test_text_item_never_gates() {
        let (registry, checklist) = reference_registry();
        let mut session = ControlSession::new();
        session.start("CMD-1001", &registry).unwrap();

        session
            .set_response(checklist[0].id.clone(), ResponseValue::PassFail(true))
            .unwrap();
        session
            .set_response(checklist[1].id.clone(), ResponseValue::PassFail(false))
            .unwrap();
        // Text item left empty on purpose
        assert!(session.active().unwrap().checklist_ready());

        match session.save_sample("S-1").unwrap() {
            SessionProgress::Sampling { saved, remaining } => {
                assert_eq!(saved, 1);
                assert_eq!(remaining, 3);
            }
            other => panic!("unexpected progress: {:?}", other),
        }

        // Unset text item defaulted to an empty response
        let sample = &session.active().unwrap().samples()[0];
        assert_eq!(sample.responses.len(), 3);
        assert_eq!(
            sample.responses[2].value,
            ResponseValue::Text(String::new())
        );
    }

    #[test]
    fn test_last_response_wins() {
        let (registry, checklist) = reference_registry();
        let mut session = ControlSession::new();
        session.start("CMD-1001", &registry).unwrap();

        let item = checklist[0].id.clone();
        session
            .set_response(item.clone(), ResponseValue::PassFail(true))
            .unwrap();
        session
            .set_response(item.clone(), ResponseValue::PassFail(false))
            .unwrap();
        assert_eq!(
            session.active().unwrap().response(&item),
            Some(&ResponseValue::PassFail(false))
        );
    }

    #[test]
    fn test_full_session_produces_one_record() {
        let (registry, checklist) = reference_registry();
        let mut session = ControlSession::new();
        let required = session.start("CMD-1001", &registry).unwrap().required_samples();
        assert_eq!(required, 4);

        let mut completed = None;
        for n in 1..=required {
            answer_all(&mut session, &checklist);
            match session.save_sample(&format!("S-{}", n)).unwrap() {
                SessionProgress::Sampling { saved, .. } => assert_eq!(saved, n),
                SessionProgress::Completed(record) => {
                    assert_eq!(n, required);
                    completed = Some(record);
                }
            }
        }

        let record = completed.expect("session should complete on the last sample");
        assert_eq!(record.samples.len() as u32, record.required_samples);
        assert_eq!(record.required_samples, 4);
        assert_eq!(record.order_number, "CMD-1001");
        assert_eq!(record.piece_count, 120);
        assert!(record.completed_at >= record.started_at);
        // Responses follow the checklist order
        for sample in &record.samples {
            let ids: Vec<_> = sample.responses.iter().map(|r| &r.item_id).collect();
            let expected: Vec<_> = checklist.iter().map(|i| &i.id).collect();
            assert_eq!(ids, expected);
        }

        // Machine reset to idle after completion
        assert!(!session.is_active());
        assert_eq!(session.save_sample("S-5").unwrap_err(), SessionError::NotActive);
    }

    #[test]
    fn test_rescan_discards_unsaved_progress() {
        let (registry, checklist) = reference_registry();
        let mut session = ControlSession::new();
        session.start("CMD-1001", &registry).unwrap();
        answer_all(&mut session, &checklist);
        session.save_sample("S-1").unwrap();
        assert_eq!(session.active().unwrap().samples().len(), 1);

        session.start("CMD-1001", &registry).unwrap();
        assert!(session.active().unwrap().samples().is_empty());
        assert!(!session.active().unwrap().checklist_ready());
    }
}
