use std::collections::HashMap;

use crate::models::{AggregateStats, DistributionSlice, OutpassRecord, StatusSummary};
use crate::normalize::{OUTPASS_TYPE, STATUS};

/// How a distribution bucket recognizes a lower-cased outpass type.
#[derive(Debug, Clone, Copy)]
pub enum TypeMatcher {
    Exact(&'static [&'static str]),
    Contains(&'static str),
}

impl TypeMatcher {
    pub fn matches(&self, outpass_type: &str) -> bool {
        match self {
            TypeMatcher::Exact(values) => values.iter().any(|value| *value == outpass_type),
            TypeMatcher::Contains(fragment) => outpass_type.contains(fragment),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Bucket {
    pub label: &'static str,
    pub matcher: TypeMatcher,
    pub color: &'static str,
}

/// Dashboard buckets in display order. Types matching none of them are
/// left out of the distribution but still counted in the total.
pub const OUTPASS_BUCKETS: [Bucket; 4] = [
    Bucket {
        label: "OD",
        matcher: TypeMatcher::Exact(&["od"]),
        color: "#3b82f6",
    },
    Bucket {
        label: "Home Pass",
        matcher: TypeMatcher::Contains("home"),
        color: "#10b981",
    },
    Bucket {
        label: "Emergency",
        matcher: TypeMatcher::Exact(&["emergency"]),
        color: "#ef4444",
    },
    Bucket {
        label: "Outing Pass",
        matcher: TypeMatcher::Exact(&["outing", "medical"]),
        color: "#f59e0b",
    },
];

fn normalized_type(record: &OutpassRecord) -> String {
    record.field(&OUTPASS_TYPE).trim().to_lowercase()
}

fn is_pending(record: &OutpassRecord) -> bool {
    record.field(&STATUS).trim().eq_ignore_ascii_case("pending")
}

pub fn aggregate(records: &[OutpassRecord]) -> AggregateStats {
    let mut stats = AggregateStats {
        total: records.len(),
        ..AggregateStats::default()
    };

    for record in records {
        if !is_pending(record) {
            continue;
        }
        stats.pending_approvals += 1;
        if normalized_type(record) == "emergency" {
            stats.emergency_requests += 1;
        }
    }

    stats
}

pub fn distribution(records: &[OutpassRecord], buckets: &[Bucket]) -> Vec<DistributionSlice> {
    let types: Vec<String> = records.iter().map(normalized_type).collect();

    buckets
        .iter()
        .map(|bucket| DistributionSlice {
            label: bucket.label,
            value: types
                .iter()
                .filter(|outpass_type| bucket.matcher.matches(outpass_type))
                .count(),
            color: bucket.color,
        })
        .collect()
}

pub fn summarize_by_status(records: &[OutpassRecord]) -> Vec<StatusSummary> {
    let mut map: HashMap<String, usize> = HashMap::new();

    for record in records {
        *map.entry(record.field(&STATUS).into_owned()).or_insert(0) += 1;
    }

    let mut summaries: Vec<StatusSummary> = map
        .into_iter()
        .map(|(status, count)| StatusSummary { status, count })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.status.cmp(&b.status)));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_records;
    use crate::models::{FilterCriteria, Snapshot, TimeWindow, TypeFilter};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn typed(outpass_type: &str, status: &str) -> OutpassRecord {
        OutpassRecord::new(json!({ "outpassType": outpass_type, "outpassStatus": status }))
    }

    fn values(slices: &[DistributionSlice]) -> Vec<(&'static str, usize)> {
        slices.iter().map(|s| (s.label, s.value)).collect()
    }

    #[test]
    fn unrecognized_types_are_dropped_from_distribution_only() {
        let records: Vec<OutpassRecord> = ["od", "home pass", "foo", "emergency", "emergency"]
            .into_iter()
            .map(|t| typed(t, "Approved"))
            .collect();

        let slices = distribution(&records, &OUTPASS_BUCKETS);
        assert_eq!(
            values(&slices),
            vec![("OD", 1), ("Home Pass", 1), ("Emergency", 2), ("Outing Pass", 0)]
        );
        assert_eq!(aggregate(&records).total, 5);
        assert!(slices.iter().map(|s| s.value).sum::<usize>() <= records.len());
    }

    #[test]
    fn medical_and_outing_share_a_bucket() {
        let records = vec![typed("Outing", "Pending"), typed("MEDICAL", "Pending")];
        let slices = distribution(&records, &OUTPASS_BUCKETS);
        assert_eq!(slices[3].label, "Outing Pass");
        assert_eq!(slices[3].value, 2);
    }

    #[test]
    fn home_bucket_matches_any_home_variant() {
        assert!(TypeMatcher::Contains("home").matches("homepass"));
        assert!(TypeMatcher::Contains("home").matches("home pass"));
        assert!(!TypeMatcher::Exact(&["od"]).matches("od pass"));
    }

    #[test]
    fn custom_bucket_table_is_honored() {
        let buckets = [Bucket {
            label: "Anything",
            matcher: TypeMatcher::Contains("o"),
            color: "#000000",
        }];
        let records = vec![typed("od", "-"), typed("outing", "-"), typed("emergency", "-")];
        assert_eq!(values(&distribution(&records, &buckets)), vec![("Anything", 2)]);
    }

    #[test]
    fn colors_follow_bucket_order() {
        let slices = distribution(&[], &OUTPASS_BUCKETS);
        let colors: Vec<&str> = slices.iter().map(|s| s.color).collect();
        assert_eq!(colors, vec!["#3b82f6", "#10b981", "#ef4444", "#f59e0b"]);
        assert!(slices.iter().all(|s| s.value == 0));
    }

    #[test]
    fn emergency_requests_count_only_pending_emergencies() {
        let records = vec![
            typed("Emergency", "Pending"),
            typed("emergency", "Approved"),
            typed("OD", "pending"),
            typed("Home Pass", "Rejected"),
            OutpassRecord::new(json!({ "type": "emergency", "status": "PENDING" })),
        ];
        let stats = aggregate(&records);
        assert_eq!(
            stats,
            AggregateStats {
                total: 5,
                pending_approvals: 3,
                emergency_requests: 2,
            }
        );
    }

    #[test]
    fn missing_status_is_not_pending() {
        let stats = aggregate(&[OutpassRecord::new(json!({ "outpassType": "od" }))]);
        assert_eq!(stats.pending_approvals, 0);
    }

    #[test]
    fn stats_ignore_active_filters() {
        let snapshot = Snapshot::new(vec![
            typed("od", "Pending"),
            typed("emergency", "Pending"),
            typed("outing", "Approved"),
        ]);
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let criteria = FilterCriteria {
            outpass_type: TypeFilter::Od,
            time_window: TimeWindow::Today,
            search_text: "nobody".to_string(),
        };

        let before = (snapshot.stats(), snapshot.distribution());
        assert!(filter_records(snapshot.records(), &criteria, &now).is_empty());
        assert_eq!((snapshot.stats(), snapshot.distribution()), before);
        assert_eq!(before.0.total, 3);
    }

    #[test]
    fn status_summary_orders_by_count_then_name() {
        let records = vec![
            typed("od", "Approved"),
            typed("od", "Pending"),
            typed("od", "Approved"),
            typed("od", "Rejected"),
        ];
        let summary = summarize_by_status(&records);
        assert_eq!(
            summary,
            vec![
                StatusSummary { status: "Approved".to_string(), count: 2 },
                StatusSummary { status: "Pending".to_string(), count: 1 },
                StatusSummary { status: "Rejected".to_string(), count: 1 },
            ]
        );
    }
}
