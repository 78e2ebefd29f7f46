//! Turns whatever the agent pipeline returned into a batch of meme records.
//!
//! Normalization never fails: anything that cannot be read as records ends up
//! as a single `{"raw_output": ...}` fallback record.

use serde_json::Value;

use crate::links::{self, DEFAULT_MAX_LINKS};
use crate::models::{MemeRecord, RawAgentOutput};

pub fn normalize(raw: RawAgentOutput) -> Vec<MemeRecord> {
    match raw {
        RawAgentOutput::List(items) => items.into_iter().map(into_record).collect(),
        RawAgentOutput::Object(map) => vec![MemeRecord::from(map)],
        RawAgentOutput::Text(text) => normalize_text(text.trim()),
        RawAgentOutput::Other(value) => vec![MemeRecord::fallback(value_to_text(&value))],
    }
}

fn normalize_text(text: &str) -> Vec<MemeRecord> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items.into_iter().map(into_record).collect(),
        Ok(Value::Object(map)) => vec![MemeRecord::from(map)],
        Ok(_) | Err(_) => {
            tracing::debug!(len = text.len(), "agent output is not a JSON array or object");
            vec![MemeRecord::fallback(text)]
        }
    }
}

fn into_record(item: Value) -> MemeRecord {
    match item {
        Value::Object(map) => MemeRecord::from(map),
        other => MemeRecord::fallback(value_to_text(&other)),
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// True when any record in the batch is a `raw_output` fallback.
pub fn is_fallback_batch(batch: &[MemeRecord]) -> bool {
    batch.iter().any(MemeRecord::is_fallback)
}

/// Replace `evidence_links` on every record with synthesized search URLs.
///
/// A batch containing any fallback record is returned untouched.
pub fn apply_links(batch: Vec<MemeRecord>) -> Vec<MemeRecord> {
    if is_fallback_batch(&batch) {
        return batch;
    }
    batch
        .iter()
        .map(|record| record.with_evidence_links(links::synthesize(record, DEFAULT_MAX_LINKS)))
        .collect()
}
