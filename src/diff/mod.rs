pub mod path;

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::report::{type_tag, Reporter};
use path::{DiffPath, MatchKey, Root, Segment};

/// One depth-first walk over a pair of trees.
///
/// The engine drives traversal from the expected side, threads the current
/// path through every recursive call, and hands each detected difference to
/// the reporter. Differences never halt the walk; every reachable expected
/// node is visited exactly once per run.
pub(crate) struct Engine<'a> {
    match_keys: &'a [MatchKey],
    ignore: &'a HashSet<Vec<Segment>>,
    coerce_types: bool,
    report: &'a mut Reporter,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(
        match_keys: &'a [MatchKey],
        ignore: &'a HashSet<Vec<Segment>>,
        coerce_types: bool,
        report: &'a mut Reporter,
    ) -> Self {
        Self {
            match_keys,
            ignore,
            coerce_types,
            report,
        }
    }

    /// Compares `actual` against `expected`, labelling paths with the side
    /// under test. Only object-vs-object and array-vs-array roots have
    /// defined semantics; anything else aborts without a log line.
    pub(crate) fn run(
        &mut self,
        root: Root,
        expected: &Value,
        actual: &Value,
    ) -> Result<(), Error> {
        debug!(root = %root, "starting comparison run");
        let path = DiffPath::root(root);
        match (expected, actual) {
            (Value::Object(exp), Value::Object(act)) => {
                self.compare_objects(&path, exp, act);
                Ok(())
            }
            (Value::Array(exp), Value::Array(act)) => {
                self.compare_arrays(&path, exp, act);
                Ok(())
            }
            _ => Err(Error::RootKindMismatch {
                expected: type_tag(expected),
                actual: type_tag(actual),
            }),
        }
    }

    /// Walks every key of the expected object in its iteration order. Keys
    /// present only in the actual object are never visited; each sub-run is
    /// one-directional by construction.
    fn compare_objects(
        &mut self,
        path: &DiffPath,
        expected: &Map<String, Value>,
        actual: &Map<String, Value>,
    ) {
        for (key, val) in expected {
            let child = path.child(Segment::Field(key.clone()));
            match actual.get(key) {
                None => self.report.missing_property(&child),
                Some(act) => self.compare_value(&child, val, act),
            }
        }
    }

    fn compare_value(&mut self, path: &DiffPath, expected: &Value, actual: &Value) {
        match expected {
            Value::Object(exp) => match actual {
                Value::Object(act) => self.compare_objects(path, exp, act),
                Value::String(raw) if self.coerce_types => {
                    self.decode_and_compare(path, expected, actual, raw)
                }
                _ => self.report.incorrect_type(path, expected, actual),
            },
            Value::Array(exp) => match actual {
                Value::Array(act) => self.compare_arrays(path, exp, act),
                Value::String(raw) if self.coerce_types => {
                    self.decode_and_compare(path, expected, actual, raw)
                }
                _ => self.report.incorrect_type(path, expected, actual),
            },
            _ => {
                if expected != actual && !self.is_ignored(path) {
                    self.compare_scalars(path, expected, actual);
                }
            }
        }
    }

    /// A string-encoded container on the actual side is decoded and compared
    /// in place when coercion is on; a decode failure or a decoded value of
    /// the wrong kind reports incorrect-type.
    fn decode_and_compare(&mut self, path: &DiffPath, expected: &Value, actual: &Value, raw: &str) {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(ref parsed)) => {
                if let Value::Object(exp) = expected {
                    self.compare_objects(path, exp, parsed);
                } else {
                    self.report.incorrect_type(path, expected, actual);
                }
            }
            Ok(Value::Array(ref parsed)) => {
                if let Value::Array(exp) = expected {
                    self.compare_arrays(path, exp, parsed);
                } else {
                    self.report.incorrect_type(path, expected, actual);
                }
            }
            _ => self.report.incorrect_type(path, expected, actual),
        }
    }

    fn compare_arrays(&mut self, path: &DiffPath, expected: &[Value], actual: &[Value]) {
        let path = path.child(Segment::Array);
        // length check is a pre-check on raw lengths, independent of how
        // elements end up matched
        self.check_lengths(&path, expected.len(), actual.len());

        let keys = self.match_keys_at(&path);
        if keys.is_empty() {
            self.compare_by_position(&path, expected, actual);
        } else {
            self.compare_by_keys(&path, &keys, expected, actual);
        }
    }

    fn check_lengths(&mut self, path: &DiffPath, exp_len: usize, act_len: usize) {
        if exp_len > act_len {
            self.report.lack_of_array_items(path, exp_len, act_len);
        } else if exp_len < act_len {
            self.report.exceeding_array_items(path, exp_len, act_len);
        }
    }

    /// Identity-key properties configured for this array location. Matching
    /// is index-insensitive, so the same spec applies to an array wherever
    /// it sits under repeated elements.
    fn match_keys_at(&self, path: &DiffPath) -> Vec<&'a str> {
        let normalized = path.normalized();
        self.match_keys
            .iter()
            .filter(|key| key.array_path == normalized)
            .map(|key| key.property.as_str())
            .collect()
    }

    fn compare_by_position(&mut self, path: &DiffPath, expected: &[Value], actual: &[Value]) {
        for (idx, val) in expected.iter().enumerate() {
            // elements past the actual length were already reported by the
            // length pre-check
            let Some(act) = actual.get(idx) else { break };
            let child = path.child(Segment::Index(idx));
            self.compare_value(&child, val, act);
        }
    }

    /// Matches object elements by the configured identity keys instead of
    /// position: the first actual element agreeing on every key property is
    /// compared, and an expected element with no match is reported as
    /// missing. Actual elements matching nothing are never reported.
    fn compare_by_keys(
        &mut self,
        path: &DiffPath,
        keys: &[&str],
        expected: &[Value],
        actual: &[Value],
    ) {
        for (idx, val) in expected.iter().enumerate() {
            let child = path.child(Segment::Index(idx));
            if let Value::Object(exp) = val {
                let wanted: Vec<(&str, Option<&Value>)> =
                    keys.iter().map(|key| (*key, exp.get(*key))).collect();
                let matched = actual.iter().find_map(|candidate| match candidate {
                    Value::Object(obj)
                        if wanted.iter().all(|(key, value)| obj.get(*key) == *value) =>
                    {
                        Some(obj)
                    }
                    _ => None,
                });
                match matched {
                    Some(act) => self.compare_objects(&child, exp, act),
                    None => self.report.missing_array_item(&child, &wanted),
                }
            } else if let Some(act) = actual.get(idx) {
                // non-object elements fall back to positional comparison
                self.compare_value(&child, val, act);
            }
        }
    }

    fn is_ignored(&self, path: &DiffPath) -> bool {
        self.ignore.contains(&path.normalized())
    }

    /// Called with values already known unequal by `!=`. With coercion off
    /// every pair lands in the reporter; with it on, the actual value is
    /// cast towards the expected kind first and coercion failures fall
    /// through silently.
    fn compare_scalars(&mut self, path: &DiffPath, expected: &Value, actual: &Value) {
        if self.coerce_types && coerced_eq(expected, actual) {
            return;
        }
        self.report.unequal_values(path, expected, actual);
    }
}

fn coerced_eq(expected: &Value, actual: &Value) -> bool {
    match expected {
        Value::Number(n) => {
            if let Some(exp) = n.as_i64() {
                if as_coerced_i64(actual) == Some(exp) {
                    return true;
                }
            }
            if let Some(exp) = n.as_f64() {
                if as_coerced_f64(actual) == Some(exp) {
                    return true;
                }
            }
            false
        }
        Value::String(exp) => as_coerced_string(actual).as_deref() == Some(exp.as_str()),
        Value::Bool(exp) => as_coerced_bool(actual) == Some(*exp),
        _ => false,
    }
}

fn as_coerced_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn as_coerced_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn as_coerced_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_coerced_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}
