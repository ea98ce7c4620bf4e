//! Canonical JSON encoding used as hash input.
//!
//! Object keys are emitted in lexicographic byte order at every nesting level,
//! with no insignificant whitespace. Scalars are rendered exactly as
//! `serde_json` renders them. Two payloads with the same keys, structure and
//! scalar values always encode to the same bytes, whatever order the maps were
//! built in.

use crate::error::LedgerError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Opaque block payload: string keys to arbitrary JSON values.
pub type Payload = BTreeMap<String, Value>;

pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

pub fn canonical_payload(payload: &Payload) -> String {
    let mut out = String::new();
    write_object(&mut out, payload.iter());
    out
}

/// Convert any serializable value into a payload.
///
/// Fails if serde cannot represent the value as JSON, or if the value is not
/// a JSON object.
pub fn payload_from<T: Serialize + ?Sized>(value: &T) -> Result<Payload, LedgerError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(LedgerError::PayloadNotObject(kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_str(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => write_object(out, map.iter()),
    }
}

fn write_object<'a, I>(out: &mut String, entries: I)
where
    I: Iterator<Item = (&'a String, &'a Value)>,
{
    // serde_json's map may preserve insertion order depending on features.
    let mut entries: Vec<_> = entries.collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_str(out, key);
        out.push(':');
        write_value(out, value);
    }
    out.push('}');
}

fn write_str(out: &mut String, s: &str) {
    // `Value`'s Display is infallible and applies serde_json's escaping.
    out.push_str(&Value::from(s).to_string());
}
