//! Filtering, grouping, and counting over fetched records.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{Record, Statistics};

/// Key used when a record has no value for the requested field.
pub const UNKNOWN_KEY: &str = "unknown";

/// Look up a field, following dots into nested objects (`address.city`).
pub fn lookup<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Render a value as a grouping key. Strings are used as-is.
pub fn value_key(value: Option<&Value>) -> String {
    match value {
        None => UNKNOWN_KEY.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Keep records whose `field` equals `value`.
pub fn filter_by_field(records: &[Record], field: &str, value: &Value) -> Vec<Record> {
    let filtered: Vec<Record> = records
        .iter()
        .filter(|r| lookup(r, field) == Some(value))
        .cloned()
        .collect();
    tracing::info!(
        "Filtered {} items by {field}={value}, result: {}",
        records.len(),
        filtered.len()
    );
    filtered
}

/// Project each record onto `fields`. Missing fields are left out rather than nulled.
pub fn extract_fields(records: &[Record], fields: &[&str]) -> Vec<Record> {
    let extracted: Vec<Record> = records
        .iter()
        .map(|r| {
            fields
                .iter()
                .filter_map(|f| r.get(*f).map(|v| (f.to_string(), v.clone())))
                .collect()
        })
        .collect();
    tracing::info!(
        "Extracted {} fields from {} items",
        fields.len(),
        records.len()
    );
    extracted
}

/// Group records by the stringified value of `field`.
pub fn aggregate_by_field(records: &[Record], field: &str) -> BTreeMap<String, Vec<Record>> {
    let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
    for record in records {
        groups
            .entry(value_key(lookup(record, field)))
            .or_default()
            .push(record.clone());
    }
    tracing::info!(
        "Aggregated {} items into {} groups by {field}",
        records.len(),
        groups.len()
    );
    groups
}

/// Count occurrences of each value of `field`, in first-seen order.
pub fn count_by_field(records: &[Record], field: &str) -> Vec<(String, u64)> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for record in records {
        let key = value_key(lookup(record, field));
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    tracing::info!("Counted {} items by field {field}", records.len());
    counts
}

/// Summary of a batch: size, time of processing, and the first record's fields.
pub fn statistics(records: &[Record]) -> Statistics {
    let stats = Statistics {
        total_items: records.len(),
        timestamp: chrono::Utc::now(),
        fields: records
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default(),
        processed: true,
    };
    tracing::info!("Generated statistics for {} items", records.len());
    stats
}
