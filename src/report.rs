use std::cmp::Reverse;
use std::fmt::Write;

use chrono::{DateTime, TimeZone};

use crate::models::{OutpassRecord, Snapshot};
use crate::normalize::CREATED_AT;
use crate::stats;
use crate::window;

/// Most recently applied first; records without a readable `createdAt` go last.
pub fn recent_outpasses<'a, Tz: TimeZone>(
    records: &'a [OutpassRecord],
    tz: &Tz,
    limit: usize,
) -> Vec<&'a OutpassRecord> {
    let mut recent: Vec<&OutpassRecord> = records.iter().collect();
    recent.sort_by_key(|record| {
        Reverse(window::parse_timestamp(&record.field(&CREATED_AT), tz).map(|at| at.timestamp()))
    });
    recent.truncate(limit);
    recent
}

fn percent(value: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 * 100.0 / total as f64
    }
}

pub fn build_report<Tz: TimeZone>(snapshot: &Snapshot, now: &DateTime<Tz>) -> String {
    let stats = snapshot.stats();
    let slices = snapshot.distribution();
    let statuses = stats::summarize_by_status(snapshot.records());

    let mut output = String::new();

    let _ = writeln!(output, "# Outpass Report");
    let _ = writeln!(output, "Generated on {}", now.date_naive().format("%Y-%m-%d"));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Total outpasses: {}", stats.total);
    let _ = writeln!(output, "- Pending approvals: {}", stats.pending_approvals);
    let _ = writeln!(
        output,
        "- Action required (pending emergencies): {}",
        stats.emergency_requests
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Type Distribution");

    if stats.total == 0 {
        let _ = writeln!(output, "No outpasses recorded.");
    } else {
        for slice in slices.iter() {
            let _ = writeln!(
                output,
                "- {}: {} ({:.1}%)",
                slice.label,
                slice.value,
                percent(slice.value, stats.total)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Mix");

    if statuses.is_empty() {
        let _ = writeln!(output, "No outpasses recorded.");
    } else {
        for summary in statuses.iter() {
            let _ = writeln!(output, "- {}: {}", summary.status, summary.count);
        }
    }

    let recent = recent_outpasses(snapshot.records(), &now.timezone(), 5);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Outpasses");

    if recent.is_empty() {
        let _ = writeln!(output, "No outpasses recorded.");
    } else {
        for record in recent {
            let view = record.view();
            let applied = window::parse_timestamp(&view.created_at, &now.timezone())
                .map(|at| at.naive_local().format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                output,
                "- {} ({}) applied {}: {}, {}",
                view.student_name, view.outpass_type, applied, view.status, view.reason
            );
        }
    }

    output
}
