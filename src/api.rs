use std::path::Path;

use serde_json::Value;

use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::models::{OutpassRecord, Snapshot};

const LIST_KEYS: [&str; 4] = ["outpasses", "data", "records", "result"];

/// Fetches every outpass in a single request. No pagination, no retry.
pub async fn fetch_all_outpasses(
    client: &reqwest::Client,
    config: &SourceConfig,
) -> Result<Snapshot, FetchError> {
    let url = config.list_url();
    let mut request = client.get(&url);
    if let Some(token) = &config.token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url,
        });
    }

    let body: Value = response.json().await?;
    let snapshot = snapshot_from_body(body)?;
    log::debug!("fetched {} outpasses from {url}", snapshot.len());
    Ok(snapshot)
}

/// Reads a snapshot previously saved from the list endpoint.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, FetchError> {
    let text = std::fs::read_to_string(path)?;
    let body: Value = serde_json::from_str(&text)?;
    let snapshot = snapshot_from_body(body)?;
    log::debug!("loaded {} outpasses from {}", snapshot.len(), path.display());
    Ok(snapshot)
}

/// Accepts a bare array or an object wrapping the array under a known key.
pub fn snapshot_from_body(body: Value) -> Result<Snapshot, FetchError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                FetchError::Shape(format!("no record array under any of {:?}", LIST_KEYS))
            })?,
        other => {
            return Err(FetchError::Shape(format!(
                "expected array or object, got {}",
                kind(&other)
            )))
        }
    };

    Ok(Snapshot::new(items.into_iter().map(OutpassRecord::new).collect()))
}

/// Empty snapshot on failure, after warning the user.
pub fn snapshot_or_empty(result: Result<Snapshot, FetchError>) -> Snapshot {
    match result {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::warn!("falling back to an empty snapshot: {err}");
            eprintln!("warning: could not load outpasses ({err}); showing no records");
            Snapshot::default()
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
