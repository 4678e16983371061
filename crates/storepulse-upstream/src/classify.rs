//! Customer-source classifier.
//!
//! Groups booking records by acquisition source with a fallback chain:
//! the explicit `Source` field, then a `Tags:` marker buried in the
//! free-text description, then a caller-chosen sentinel. Customers are
//! deduplicated by identifier before classification, so bucket counts
//! partition the customer set exactly.

use std::collections::{BTreeMap, HashSet};

use storepulse_core::CustomerBucket;

use crate::types::BookingItem;

/// Sentinel for the new-customer view when no source can be determined.
pub const UNCLASSIFIED_SOURCE: &str = "unclassified";

/// Sentinel for the returning-customer view. Kept distinct from
/// [`UNCLASSIFIED_SOURCE`] on purpose: the two views have always reported
/// their missing-data cases differently and downstream dashboards key on it.
pub const GENERIC_APP_SOURCE: &str = "app";

const TAGS_MARKER: &str = "Tags:";

/// Classifies booking records into acquisition-source buckets.
///
/// Only the first occurrence of each customer identifier is counted;
/// records without an identifier share one slot. Bucket order is
/// deterministic (sorted by label) but not significant to callers.
#[must_use]
pub fn classify_sources(items: &[BookingItem], fallback_label: &str) -> Vec<CustomerBucket> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();

    for item in items {
        let member_id = item.member_id.unwrap_or(0);
        if !seen.insert(member_id) {
            continue;
        }

        let label = source_label(item, fallback_label);
        *counts.entry(label).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(source, count)| CustomerBucket { source, count })
        .collect()
}

/// Resolves one record's source label via the fallback chain.
fn source_label(item: &BookingItem, fallback_label: &str) -> String {
    if let Some(source) = item.source() {
        let trimmed = source.trim();
        if !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(GENERIC_APP_SOURCE) {
            return source.to_owned();
        }
    }

    item.desc
        .as_deref()
        .and_then(extract_tag)
        .unwrap_or_else(|| fallback_label.to_owned())
}

/// Pulls the label after the literal `Tags:` marker out of a free-text
/// description, truncated at the first newline and trimmed.
fn extract_tag(desc: &str) -> Option<String> {
    let start = desc.find(TAGS_MARKER)? + TAGS_MARKER.len();
    let rest = &desc[start..];
    let tag = rest.split('\n').next().unwrap_or(rest).trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_owned())
    }
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
