//! Property-based tests for search merging.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use super::{SearchHit, merge};
use crate::report::ReportKind;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

fn arb_hit() -> impl Strategy<Value = SearchHit> {
    (
        prop::sample::select(ReportKind::ALL.to_vec()),
        "[A-Z2-9]{8}",
        0i64..1_000,
    )
        .prop_map(|(kind, suffix, minutes)| SearchHit {
            id: Uuid::new_v4(),
            kind,
            category: kind.label(),
            tracking_code: format!("YC-{}-{suffix}", kind.tracking_prefix()),
            status: "open".to_string(),
            title: String::new(),
            created_at: base() + Duration::minutes(minutes),
        })
}

proptest! {
    /// Output is ordered by created_at descending.
    #[test]
    fn prop_merge_is_sorted(batches in prop::collection::vec(prop::collection::vec(arb_hit(), 0..10), 0..7)) {
        let merged = merge(batches);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].created_at >= pair[1].created_at);
            if pair[0].created_at == pair[1].created_at {
                prop_assert!(pair[0].tracking_code <= pair[1].tracking_code);
            }
        }
    }

    /// Merging keeps every hit and its label.
    #[test]
    fn prop_merge_keeps_hits_and_labels(batches in prop::collection::vec(prop::collection::vec(arb_hit(), 0..10), 0..7)) {
        let total: usize = batches.iter().map(Vec::len).sum();
        let merged = merge(batches);
        prop_assert_eq!(merged.len(), total);
        for hit in &merged {
            prop_assert_eq!(hit.category, hit.kind.label());
        }
    }
}
