// Copyright 2025 The json-compare Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::diff::path::DiffPath;

/// The closed set of detectable mismatch categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DiffKind {
    #[serde(rename = "missing_obj_property")]
    MissingProperty,
    #[serde(rename = "incorrect_type")]
    IncorrectType,
    #[serde(rename = "arr_with_lack_of_items")]
    LackOfArrayItems,
    #[serde(rename = "exceeding_array_items")]
    ExceedingArrayItems,
    #[serde(rename = "unequal_value")]
    UnequalValue,
    #[serde(rename = "missing_array_item")]
    MissingArrayItem,
}

impl DiffKind {
    /// All kinds, in the fixed order used for summary breakdowns.
    pub const ALL: [DiffKind; 6] = [
        DiffKind::MissingProperty,
        DiffKind::IncorrectType,
        DiffKind::LackOfArrayItems,
        DiffKind::ExceedingArrayItems,
        DiffKind::UnequalValue,
        DiffKind::MissingArrayItem,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DiffKind::MissingProperty => "missing_obj_property",
            DiffKind::IncorrectType => "incorrect_type",
            DiffKind::LackOfArrayItems => "arr_with_lack_of_items",
            DiffKind::ExceedingArrayItems => "exceeding_array_items",
            DiffKind::UnequalValue => "unequal_value",
            DiffKind::MissingArrayItem => "missing_array_item",
        }
    }
}

/// Structured form of the summary trailer, for callers that want counts as
/// data rather than text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub counts: BTreeMap<&'static str, usize>,
}

/// Accumulates formatted difference blocks and per-kind counters.
///
/// The reporter never drives traversal; the comparison engine hands it the
/// current path with every record call.
#[derive(Debug, Default)]
pub(crate) struct Reporter {
    log: Vec<String>,
    counts: [usize; DiffKind::ALL.len()],
    summary: Option<String>,
}

impl Reporter {
    pub(crate) fn reset(&mut self) {
        self.log.clear();
        self.counts = [0; DiffKind::ALL.len()];
        self.summary = None;
    }

    pub(crate) fn log(&self) -> &[String] {
        &self.log
    }

    pub(crate) fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub(crate) fn count(&self, kind: DiffKind) -> usize {
        self.counts[kind as usize]
    }

    pub(crate) fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub(crate) fn summary_record(&self) -> Summary {
        let counts = DiffKind::ALL
            .iter()
            .map(|kind| (kind.label(), self.count(*kind)))
            .collect();
        Summary {
            total: self.total(),
            counts,
        }
    }

    fn record(&mut self, kind: DiffKind, path: &DiffPath, message: String) {
        trace!(kind = kind.label(), path = %path, "{}", message);
        self.log.push(format!("{}\n{}", path, message));
        self.counts[kind as usize] += 1;
    }

    pub(crate) fn missing_property(&mut self, path: &DiffPath) {
        self.record(
            DiffKind::MissingProperty,
            path,
            "property is missing".to_string(),
        );
    }

    pub(crate) fn incorrect_type(&mut self, path: &DiffPath, expected: &Value, actual: &Value) {
        let message = format!(
            "incorrect type: expected {} ({}), got {} ({}) instead",
            render(expected),
            type_tag(expected),
            render(actual),
            type_tag(actual),
        );
        self.record(DiffKind::IncorrectType, path, message);
    }

    pub(crate) fn lack_of_array_items(&mut self, path: &DiffPath, exp_len: usize, act_len: usize) {
        let message = format!(
            "lack of items in array: expected {} items, got only {}",
            exp_len, act_len
        );
        self.record(DiffKind::LackOfArrayItems, path, message);
    }

    pub(crate) fn exceeding_array_items(
        &mut self,
        path: &DiffPath,
        exp_len: usize,
        act_len: usize,
    ) {
        let message = format!(
            "too much items in array: expected {} items, got {}",
            exp_len, act_len
        );
        self.record(DiffKind::ExceedingArrayItems, path, message);
    }

    /// Records an unequal-value difference. Values that turn out to be of
    /// different runtime kinds are redirected to incorrect-type instead and
    /// are never counted twice.
    pub(crate) fn unequal_values(&mut self, path: &DiffPath, expected: &Value, actual: &Value) {
        if type_tag(expected) != type_tag(actual) {
            return self.incorrect_type(path, expected, actual);
        }
        let message = format!(
            "unequal values: expected {}, got {} instead",
            render_quoted(expected),
            render_quoted(actual),
        );
        self.record(DiffKind::UnequalValue, path, message);
    }

    pub(crate) fn missing_array_item(
        &mut self,
        path: &DiffPath,
        props: &[(&str, Option<&Value>)],
    ) {
        let expected_props = props
            .iter()
            .map(|(key, value)| match value {
                Some(value) => format!("{}: {}", key, render_quoted(value)),
                None => format!("{}: null", key),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!(
            "missing array item: expected <object> with {}",
            expected_props
        );
        self.record(DiffKind::MissingArrayItem, path, message);
    }

    /// Appends the summary trailer to the log and caches it. Called once at
    /// the end of each top-level comparison entry point.
    pub(crate) fn build_summary(&mut self) -> &str {
        let mut summary = format!(
            "---------------------\nTOTAL: {} differences\n",
            self.log.len()
        );
        for kind in DiffKind::ALL {
            let count = self.count(kind);
            if count > 0 {
                summary.push_str(&format!("-{}: {}\n", kind.label(), count));
            }
        }
        self.log.push(summary.clone());
        self.summary.insert(summary).as_str()
    }
}

/// Bracketed tag for a value's runtime kind, with the integer/float
/// distinction preserved.
pub(crate) fn type_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "<null>",
        Value::Bool(_) => "<bool>",
        Value::Number(n) if n.is_f64() => "<float>",
        Value::Number(_) => "<int>",
        Value::String(_) => "<str>",
        Value::Array(_) => "<array>",
        Value::Object(_) => "<object>",
    }
}

// Containers render as their type tag, never their contents.
fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) => "<array>".to_string(),
        Value::Object(_) => "<object>".to_string(),
    }
}

fn render_quoted(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => render(other),
    }
}
