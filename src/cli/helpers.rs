//! Shared helper functions for CLI commands

use chrono::{DateTime, Local, Utc};
use miette::{miette, Result};

use crate::core::identity::EntityId;
use crate::core::registry::Registry;
use crate::entities::exigence::{Exigence, SampleRule};
use crate::entities::order::OrderConfig;

/// Format an EntityId for display, truncating if too long
pub fn format_short_id(id: &EntityId) -> String {
    let s = id.to_string();
    if s.len() > 16 {
        format!("{}...", &s[..13])
    } else {
        s
    }
}

/// Truncate a string to max_len, adding "..." if truncated.
/// Cuts on char boundaries, so accented names are safe.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    console::truncate_str(s, max_len, "...").into_owned()
}

/// Render a timestamp in local time for terminal output
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// One-line summary of a sampling rule
pub fn rule_summary(rule: &SampleRule) -> String {
    let mut parts = Vec::new();
    match rule.pieces_per_sample {
        Some(p) if p > 0 => parts.push(format!("1 sample / {} pieces", p)),
        _ => parts.push("fixed count".to_string()),
    }
    if let Some(min) = rule.min_samples {
        parts.push(format!("min {}", min));
    }
    if let Some(max) = rule.max_samples {
        parts.push(format!("max {}", max));
    }
    parts.join(", ")
}

/// Resolve an exigence by full ID or exact code
pub fn resolve_exigence<'a>(registry: &'a Registry, key: &str) -> Result<&'a Exigence> {
    if let Ok(id) = EntityId::parse(key) {
        if let Some(exigence) = registry.exigence(&id) {
            return Ok(exigence);
        }
    }
    registry
        .find_exigence_by_code(key)
        .ok_or_else(|| miette!("no exigence matches \"{}\" (expected an ID or code)", key))
}

/// Resolve an order by full ID or order number (case-insensitive)
pub fn resolve_order<'a>(registry: &'a Registry, key: &str) -> Result<&'a OrderConfig> {
    if let Ok(id) = EntityId::parse(key) {
        if let Some(order) = registry.order(&id) {
            return Ok(order);
        }
    }
    registry
        .find_order(key)
        .ok_or_else(|| miette!("no order matches \"{}\" (expected an ID or order number)", key))
}
