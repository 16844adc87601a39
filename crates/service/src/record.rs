//! Records are schema-less JSON values keyed by their `model` field.

use serde_json::Value;

/// A single stored entry. Any JSON value is accepted and passed through
/// untouched; lookups only consider objects with a string `model` field.
pub type Record = Value;

/// Field holding the lookup key.
pub const KEY_FIELD: &str = "model";

/// Key of a record, if it is an object with a string `model`.
pub fn record_key(record: &Record) -> Option<&str> {
    record.get(KEY_FIELD).and_then(Value::as_str)
}

/// Index of the first record whose key equals `key`.
pub fn position_of(records: &[Record], key: &str) -> Option<usize> {
    records.iter().position(|r| record_key(r) == Some(key))
}

/// Parse file content as a collection. Anything but a top-level array fails.
pub fn parse_collection(bytes: &[u8]) -> Result<Vec<Record>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Pretty-print a collection with two-space indentation.
pub fn encode_collection(records: &[Record]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(records)
}
