use chrono::{DateTime, TimeZone};

use crate::models::{FilterCriteria, OutpassRecord, TypeFilter};
use crate::normalize::{FROM_DATE, OUTPASS_TYPE, REGISTER_NUMBER, STUDENT_NAME};
use crate::window;

/// Records passing the type, time-window and search predicates, in input order.
pub fn filter_records<'a, Tz, I>(
    records: I,
    criteria: &FilterCriteria,
    now: &DateTime<Tz>,
) -> Vec<&'a OutpassRecord>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a OutpassRecord>,
{
    let needle = criteria.search_text.to_lowercase();
    let tz = now.timezone();
    let filtered: Vec<&OutpassRecord> = records
        .into_iter()
        .filter(|record| matches_type(record, criteria.outpass_type))
        .filter(|record| {
            window::classify(&record.field(&FROM_DATE), criteria.time_window, now)
        })
        .filter(|record| matches_search(record, &needle, &tz))
        .collect();

    log::debug!(
        "filter type={} window={} search={:?} kept {} records",
        criteria.outpass_type,
        criteria.time_window,
        criteria.search_text,
        filtered.len()
    );
    filtered
}

/// Lower-cased with all whitespace removed, so "Home Pass" and "homepass" compare equal.
pub fn squash(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn matches_type(record: &OutpassRecord, filter: TypeFilter) -> bool {
    let Some(wanted) = filter.needle() else {
        return true;
    };
    let wanted = squash(wanted);
    let actual = squash(&record.field(&OUTPASS_TYPE));
    actual == wanted || actual.contains(&wanted)
}

/// `needle` must already be lower-cased.
pub fn matches_search<Tz: TimeZone>(record: &OutpassRecord, needle: &str, tz: &Tz) -> bool {
    if needle.is_empty() {
        return true;
    }
    let from_date = record.field(&FROM_DATE);
    let rendered = window::locale_date(&from_date, tz).unwrap_or_default();

    [
        record.field(&STUDENT_NAME).to_lowercase(),
        record.field(&REGISTER_NUMBER).to_lowercase(),
        rendered.to_lowercase(),
        from_date.to_lowercase(),
    ]
    .iter()
    .any(|haystack| haystack.contains(needle))
}
