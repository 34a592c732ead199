//! Configuration registry - exigences, orders and the operation log
//!
//! One explicit state object owns all three collections. Commands mutate it
//! and write it back through the store; there is no ambient singleton.
//! Validation (non-empty fields, checklist length, positive piece counts)
//! is the caller's job; the registry only enforces referential integrity.

use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::exigence::{ChecklistItem, Exigence, SampleRule};
use crate::entities::operation::OperationRecord;
use crate::entities::order::OrderConfig;

/// Upsert payload for an exigence; `id: None` creates, `Some` updates
#[derive(Debug, Clone)]
pub struct ExigencePayload {
    pub id: Option<EntityId>,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub sample_rule: SampleRule,
    pub checklist: Vec<ChecklistItem>,
}

/// Upsert payload for an order; `id: None` creates, `Some` updates
#[derive(Debug, Clone)]
pub struct OrderPayload {
    pub id: Option<EntityId>,
    pub order_number: String,
    pub exigence_id: EntityId,
    pub piece_count: u32,
    pub notes: Option<String>,
}

/// In-memory registry of configuration data and archived operations
#[derive(Debug, Clone, Default)]
pub struct Registry {
    exigences: Vec<Exigence>,
    orders: Vec<OrderConfig>,
    operations: Vec<OperationRecord>,
}

impl Registry {
    pub fn new(
        exigences: Vec<Exigence>,
        orders: Vec<OrderConfig>,
        operations: Vec<OperationRecord>,
    ) -> Self {
        Self {
            exigences,
            orders,
            operations,
        }
    }

    pub fn exigences(&self) -> &[Exigence] {
        &self.exigences
    }

    pub fn orders(&self) -> &[OrderConfig] {
        &self.orders
    }

    /// Archived operation records, newest first
    pub fn operations(&self) -> &[OperationRecord] {
        &self.operations
    }

    pub fn exigence(&self, id: &EntityId) -> Option<&Exigence> {
        self.exigences.iter().find(|e| &e.id == id)
    }

    pub fn order(&self, id: &EntityId) -> Option<&OrderConfig> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// Case-insensitive exact lookup by order number
    pub fn find_order(&self, scan: &str) -> Option<&OrderConfig> {
        self.orders.iter().find(|o| o.matches(scan))
    }

    /// Exigence lookup by exact code (case-insensitive)
    pub fn find_exigence_by_code(&self, code: &str) -> Option<&Exigence> {
        self.exigences
            .iter()
            .find(|e| e.code.eq_ignore_ascii_case(code))
    }

    /// Create or update an exigence and return the affected ID.
    ///
    /// A payload carrying a known ID merges into the matching record with
    /// identity preserved; an unknown or absent ID appends under a fresh
    /// identity, so a submitted payload is never silently dropped.
    pub fn upsert_exigence(&mut self, payload: ExigencePayload) -> EntityId {
        if let Some(id) = payload.id.clone() {
            if let Some(existing) = self.exigences.iter_mut().find(|e| e.id == id) {
                existing.name = payload.name;
                existing.code = payload.code;
                existing.description = payload.description;
                existing.sample_rule = payload.sample_rule;
                existing.checklist = payload.checklist;
                return id;
            }
        }

        let exigence = Exigence {
            id: EntityId::new(EntityPrefix::Exg),
            name: payload.name,
            code: payload.code,
            description: payload.description,
            sample_rule: payload.sample_rule,
            checklist: payload.checklist,
        };
        let id = exigence.id.clone();
        self.exigences.push(exigence);
        id
    }

    /// Delete an exigence and cascade to every order referencing it.
    ///
    /// Both collections change in one call, so no order referencing the
    /// deleted exigence is ever observable. Returns whether the exigence
    /// existed; the cascaded order count is reported separately.
    pub fn delete_exigence(&mut self, id: &EntityId) -> (bool, usize) {
        let had_exigence = self.exigences.iter().any(|e| &e.id == id);
        self.exigences.retain(|e| &e.id != id);

        let before = self.orders.len();
        self.orders.retain(|o| &o.exigence_id != id);
        (had_exigence, before - self.orders.len())
    }

    /// Create or update an order and return the affected ID.
    ///
    /// A payload carrying a known ID merges into the matching record with
    /// identity preserved; an unknown or absent ID appends under a fresh
    /// identity, so a submitted payload is never silently dropped.
    pub fn upsert_order(&mut self, payload: OrderPayload) -> EntityId {
        if let Some(id) = payload.id.clone() {
            if let Some(existing) = self.orders.iter_mut().find(|o| o.id == id) {
                existing.order_number = payload.order_number;
                existing.exigence_id = payload.exigence_id;
                existing.piece_count = payload.piece_count;
                existing.notes = payload.notes;
                return id;
            }
        }

        let order = OrderConfig {
            id: EntityId::new(EntityPrefix::Ord),
            order_number: payload.order_number,
            exigence_id: payload.exigence_id,
            piece_count: payload.piece_count,
            notes: payload.notes,
        };
        let id = order.id.clone();
        self.orders.push(order);
        id
    }

    pub fn delete_order(&mut self, id: &EntityId) -> bool {
        let before = self.orders.len();
        self.orders.retain(|o| &o.id != id);
        self.orders.len() != before
    }

    /// Append a completed record to the front of the operation log
    pub fn log_operation(&mut self, record: OperationRecord) {
        self.operations.insert(0, record);
    }

    /// Administrative reset; returns how many records were dropped
    pub fn clear_operations(&mut self) -> usize {
        let count = self.operations.len();
        self.operations.clear();
        count
    }
}
