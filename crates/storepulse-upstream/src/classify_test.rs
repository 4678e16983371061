use super::*;
use crate::types::BookingMember;

fn item(member_id: Option<i64>, source: Option<&str>, desc: Option<&str>) -> BookingItem {
    BookingItem {
        member_id,
        member: source.map(|s| BookingMember {
            source: Some(s.to_owned()),
        }),
        desc: desc.map(str::to_owned),
        book_date: None,
    }
}

#[test]
fn uses_explicit_source_verbatim() {
    let items = vec![item(Some(1), Some("Facebook"), None)];
    let buckets = classify_sources(&items, UNCLASSIFIED_SOURCE);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].source, "Facebook");
    assert_eq!(buckets[0].count, 1);
}

#[test]
fn deduplicates_by_member_id_regardless_of_order() {
    // First occurrence wins; the duplicate's different source is discarded.
    let items = vec![
        item(Some(7), Some("Facebook"), None),
        item(Some(8), Some("TikTok"), None),
        item(Some(7), Some("TikTok"), None),
    ];
    let buckets = classify_sources(&items, UNCLASSIFIED_SOURCE);
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    assert_eq!(total, 2, "duplicate member must be counted once");
    assert_eq!(
        buckets
            .iter()
            .find(|b| b.source == "Facebook")
            .map(|b| b.count),
        Some(1)
    );
}

#[test]
fn generic_app_source_falls_back_to_desc_tags() {
    let items = vec![item(Some(1), Some("APP"), Some("Note text\nTags: VIP\nmore"))];
    let buckets = classify_sources(&items, UNCLASSIFIED_SOURCE);
    assert_eq!(buckets[0].source, "VIP");
}

#[test]
fn blank_source_falls_back_to_desc_tags() {
    let items = vec![item(Some(1), Some("  "), Some("Tags: Google Maps"))];
    let buckets = classify_sources(&items, UNCLASSIFIED_SOURCE);
    assert_eq!(buckets[0].source, "Google Maps");
}

#[test]
fn tag_truncates_at_first_newline_and_trims() {
    let items = vec![item(Some(1), None, Some("prefix Tags:  Referral \nrest"))];
    let buckets = classify_sources(&items, UNCLASSIFIED_SOURCE);
    assert_eq!(buckets[0].source, "Referral");
}

#[test]
fn missing_everything_uses_fallback_sentinel() {
    let items = vec![item(Some(1), None, Some("no marker here"))];
    let buckets = classify_sources(&items, UNCLASSIFIED_SOURCE);
    assert_eq!(buckets[0].source, "unclassified");

    let buckets = classify_sources(&items, GENERIC_APP_SOURCE);
    assert_eq!(buckets[0].source, "app");
}

#[test]
fn counts_partition_the_deduplicated_set() {
    let items = vec![
        item(Some(1), Some("Facebook"), None),
        item(Some(2), Some("Facebook"), None),
        item(Some(3), None, Some("Tags: VIP")),
        item(Some(4), None, None),
        item(Some(1), Some("TikTok"), None), // duplicate of 1
    ];
    let buckets = classify_sources(&items, UNCLASSIFIED_SOURCE);
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    assert_eq!(total, 4);
    assert_eq!(
        buckets
            .iter()
            .find(|b| b.source == "Facebook")
            .map(|b| b.count),
        Some(2)
    );
    assert_eq!(
        buckets.iter().find(|b| b.source == "VIP").map(|b| b.count),
        Some(1)
    );
    assert_eq!(
        buckets
            .iter()
            .find(|b| b.source == "unclassified")
            .map(|b| b.count),
        Some(1)
    );
}

#[test]
fn records_without_member_id_share_one_slot() {
    let items = vec![item(None, Some("Facebook"), None), item(None, Some("Zalo"), None)];
    let buckets = classify_sources(&items, UNCLASSIFIED_SOURCE);
    let total: u64 = buckets.iter().map(|b| b.count).sum();
    assert_eq!(total, 1, "id-less records deduplicate together");
}
