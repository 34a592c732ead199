//! Sampling engine - required sample count from piece count and rule

use crate::entities::exigence::SampleRule;

/// Compute how many samples an order requires.
///
/// One sample covers `pieces_per_sample` pieces, rounded up, then bounded
/// by the rule's optional min/max. A missing or non-positive
/// `pieces_per_sample` falls back to `min_samples` (or 1). The result is
/// always at least 1.
pub fn required_samples(piece_count: u32, rule: &SampleRule) -> u32 {
    let Some(per_sample) = rule.pieces_per_sample.filter(|&p| p > 0) else {
        return rule.min_samples.unwrap_or(1).max(1);
    };

    let mut count = piece_count.div_ceil(per_sample);
    if let Some(min) = rule.min_samples {
        count = count.max(min);
    }
    if let Some(max) = rule.max_samples {
        count = count.min(max);
    }

    count.max(1)
}
