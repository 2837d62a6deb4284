use std::fmt;

use chrono::{DateTime, TimeZone};
use clap::ValueEnum;
use serde_json::Value;

use crate::filter;
use crate::stats::{self, OUTPASS_BUCKETS};

/// One outpass as the backend sent it, read through [`crate::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutpassRecord {
    raw: Value,
}

impl OutpassRecord {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn id(&self) -> &str {
        self.raw.get("_id").and_then(Value::as_str).unwrap_or("")
    }
}

/// Every record returned by one fetch.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<OutpassRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<OutpassRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OutpassRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn apply_filter<Tz: TimeZone>(
        &self,
        criteria: &FilterCriteria,
        now: &DateTime<Tz>,
    ) -> Vec<&OutpassRecord> {
        filter::filter_records(&self.records, criteria, now)
    }

    pub fn stats(&self) -> AggregateStats {
        stats::aggregate(&self.records)
    }

    pub fn distribution(&self) -> Vec<DistributionSlice> {
        stats::distribution(&self.records, &OUTPASS_BUCKETS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TypeFilter {
    #[default]
    All,
    Od,
    HomePass,
    Outing,
    Emergency,
}

impl TypeFilter {
    /// Value compared against a record's outpass type, `None` for `All`.
    pub fn needle(self) -> Option<&'static str> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Od => Some("OD"),
            TypeFilter::HomePass => Some("Home Pass"),
            TypeFilter::Outing => Some("Outing"),
            TypeFilter::Emergency => Some("Emergency"),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.needle().unwrap_or("All"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeWindow {
    #[default]
    All,
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeWindow::All => "All",
            TimeWindow::Today => "Today",
            TimeWindow::Yesterday => "Yesterday",
            TimeWindow::ThisWeek => "This Week",
            TimeWindow::ThisMonth => "This Month",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub outpass_type: TypeFilter,
    pub time_window: TimeWindow,
    pub search_text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub total: usize,
    pub pending_approvals: usize,
    /// Pending emergencies.
    pub emergency_requests: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionSlice {
    pub label: &'static str,
    pub value: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub status: String,
    pub count: usize,
}
