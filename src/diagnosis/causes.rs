//! Likely-cause ranking (spec §4.7): merges issue codes, missing
//! operations, and pattern-aware adjustments into a capped, probability-
//! sorted list.

use super::{CauseRecord, MAX_CAUSES};
use crate::issue::Severity;
use crate::validator::Validator;

/// Fixed code -> (cause name, base probability) table (spec §4.7 "each
/// code maps to a fixed cause name + base probability").
fn base_cause(code: &str) -> Option<(&'static str, u8)> {
    match code {
        crate::issue::codes::MISSING_RESOURCE => Some(("Missing resource reference", 70)),
        crate::issue::codes::STATE_VIOLATION => Some(("Invalid draw/dispatch state", 85)),
        crate::issue::codes::MEMORY_BOUNDS => Some(("Out-of-bounds memory reference", 75)),
        crate::issue::codes::DUPLICATE_ID => Some(("Duplicate resource id", 50)),
        crate::issue::codes::INVALID_DESCRIPTOR => Some(("Invalid resource usage or descriptor", 70)),
        crate::issue::codes::PASS_MISMATCH => Some(("Pass or limit violation", 80)),
        crate::issue::codes::NESTED_PASS => Some(("Nested render/compute pass", 80)),
        crate::issue::codes::ZERO_COUNT => Some(("Zero-size draw or dispatch", 40)),
        crate::issue::codes::NULL_POINTER => Some(("Null pointer or misaligned buffer", 30)),
        crate::issue::codes::SUSPICIOUS_DESCRIPTOR => Some(("Unusually large descriptor", 20)),
        _ => None,
    }
}

pub(super) fn analyze(v: &Validator) -> Vec<CauseRecord> {
    let mut causes: Vec<CauseRecord> = Vec::new();
    let mut seen_names = std::collections::HashSet::new();

    for issue in v.issues().iter() {
        if let Some((name, probability)) = base_cause(issue.code) {
            if seen_names.insert(name) {
                causes.push(CauseRecord { name, probability });
            }
        }
    }

    for missing in super::missing_ops::detect(v) {
        let probability = match missing.severity {
            Severity::Error => 90,
            Severity::Warning => 60,
        };
        if seen_names.insert(missing.operation) {
            causes.push(CauseRecord { name: missing.operation, probability });
        }
    }

    let patterns = super::patterns::detect(v);
    let has_pattern = |name: &str| patterns.iter().any(|p| p.name == name);

    if has_pattern("fullscreen_quad") {
        for cause in causes.iter_mut().filter(|c| c.name.to_ascii_lowercase().contains("vertex")) {
            cause.probability = cause.probability.saturating_sub(30);
        }
    }
    if has_pattern("compute_simulation") {
        for cause in causes.iter_mut().filter(|c| {
            let lower = c.name.to_ascii_lowercase();
            lower.contains("compute") || lower.contains("dispatch")
        }) {
            cause.probability = cause.probability.saturating_add(15).min(100);
        }
    }
    if has_pattern("ping_pong_buffers") {
        for cause in causes.iter_mut().filter(|c| c.name.to_ascii_lowercase().contains("buffer")) {
            cause.probability = cause.probability.saturating_add(10).min(100);
        }
    }

    // `sort_by` is a stable sort (documented on `[T]::sort_by`), giving the
    // "insertion-sort-stable descending" ordering spec §4.7 asks for.
    causes.sort_by(|a, b| b.probability.cmp(&a.probability));
    causes.truncate(MAX_CAUSES);
    causes
}
