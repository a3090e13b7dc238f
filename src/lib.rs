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

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::diff::path::{parse_ignore_spec, parse_key_spec, MatchKey, Root, Segment};
use crate::diff::Engine;
use crate::report::Reporter;

mod diff;
mod error;
mod report;

pub use error::Error;
pub use report::{DiffKind, Summary};

/// Compares two JSON documents and accumulates a path-annotated log of every
/// difference between them.
///
/// The comparator is configured builder-style: identity-key specs make array
/// elements match by a property value instead of position, ignore paths
/// suppress scalar mismatches at a location, and type coercion tolerates
/// values that only differ in representation (`5` vs `"5"`).
///
/// Path specs are authored against the document's own root using the `DATA`
/// label, with `<array>` marking array nesting: `DATA.cats.<array>.id`.
///
/// # Examples
///
/// ```
/// use json_compare::JsonComparator;
/// use serde_json::json;
///
/// let left = json!({"cats": [{"id": 1, "name": "Nyan"}]});
/// let right = json!({"cats": [{"id": 1, "name": "Marx"}]});
///
/// let mut comparator = JsonComparator::new(left, right)
///     .with_match_key("DATA.cats.<array>.id")?;
/// comparator.compare_with_right()?;
///
/// assert_eq!(comparator.summary_record().total, 1);
/// # Ok::<(), json_compare::Error>(())
/// ```
#[derive(Debug)]
pub struct JsonComparator {
    left: Value,
    right: Value,
    match_keys: Vec<MatchKey>,
    ignore: HashSet<Vec<Segment>>,
    coerce_types: bool,
    report: Reporter,
}

impl JsonComparator {
    /// Constructs a comparator over two already-parsed documents.
    pub fn new(left: Value, right: Value) -> Self {
        Self {
            left,
            right,
            match_keys: vec![],
            ignore: HashSet::new(),
            coerce_types: false,
            report: Reporter::default(),
        }
    }

    /// Loads and parses both documents from disk.
    ///
    /// Read and parse failures surface as [`Error::Io`] and [`Error::Parse`]
    /// with the offending path; they are never treated as empty documents.
    pub fn from_files(left: impl AsRef<Path>, right: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(
            load_json(left.as_ref())?,
            load_json(right.as_ref())?,
        ))
    }

    /// Adds an identity-key spec (`DATA.cats.<array>.id`): elements of the
    /// array at that location are matched by the named property's value
    /// instead of by position. Several keys for the same location must all
    /// agree for two elements to match.
    pub fn with_match_key(mut self, spec: &str) -> Result<Self, Error> {
        self.match_keys.push(parse_key_spec(spec)?);
        Ok(self)
    }

    /// Adds an ignore path (`DATA.user.updated_at`): scalar value mismatches
    /// at that location are suppressed. Presence and container-type checks
    /// still fire. The spec carries no index markers; every array index at
    /// that depth is ignored uniformly.
    pub fn with_ignore_path(mut self, spec: &str) -> Result<Self, Error> {
        self.ignore.insert(parse_ignore_spec(spec)?);
        Ok(self)
    }

    /// Enables or disables type coercion: with it on, values that only
    /// differ in representation (`5` vs `"5"`, `1.5` vs `"1.5"`, containers
    /// encoded as JSON strings) compare as equal.
    pub fn with_type_coercion(mut self, coerce_types: bool) -> Self {
        self.coerce_types = coerce_types;
        self
    }

    /// Reports every way the right document fails to satisfy the left one.
    ///
    /// The left document is the reference; keys and array elements present
    /// only on the right are not reported.
    pub fn compare_with_right(&mut self) -> Result<(), Error> {
        self.report.reset();
        self.run(Root::Right)?;
        self.report.build_summary();
        debug!(total = self.report.total(), "comparison finished");
        Ok(())
    }

    /// Reports every way the left document fails to satisfy the right one.
    pub fn compare_with_left(&mut self) -> Result<(), Error> {
        self.report.reset();
        self.run(Root::Left)?;
        self.report.build_summary();
        debug!(total = self.report.total(), "comparison finished");
        Ok(())
    }

    /// Runs both directions into one combined log: first with the right
    /// document under test, then the left. Only this entry point guarantees
    /// detection of both additions and removals.
    pub fn full_compare(&mut self) -> Result<(), Error> {
        self.report.reset();
        self.run(Root::Right)?;
        self.run(Root::Left)?;
        self.report.build_summary();
        debug!(total = self.report.total(), "comparison finished");
        Ok(())
    }

    fn run(&mut self, side: Root) -> Result<(), Error> {
        let (expected, actual) = match side {
            Root::Right => (&self.left, &self.right),
            _ => (&self.right, &self.left),
        };
        Engine::new(
            &self.match_keys,
            &self.ignore,
            self.coerce_types,
            &mut self.report,
        )
        .run(side, expected, actual)
    }

    /// Difference blocks recorded by the most recent run, each of the form
    /// `<path>\n<message>`, followed by the summary trailer.
    pub fn log(&self) -> &[String] {
        self.report.log()
    }

    /// The summary trailer of the most recent run, or `None` if no
    /// comparison was performed yet.
    pub fn summary(&self) -> Option<&str> {
        self.report.summary()
    }

    /// Counts of the most recent run as structured data, for sinks that
    /// want JSON rather than text.
    pub fn summary_record(&self) -> Summary {
        self.report.summary_record()
    }

    /// Writes the joined log as `json_compare_diff_<date>` into `dir` and
    /// returns the written path.
    pub fn save_diff_log(&self, dir: impl AsRef<Path>) -> Result<PathBuf, Error> {
        let name = format!(
            "json_compare_diff_{}",
            chrono::Local::now().format("%Y-%m-%d")
        );
        let path = dir.as_ref().join(name);
        fs::write(&path, self.report.log().join("\n")).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

fn load_json(path: &Path) -> Result<Value, Error> {
    let data = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}
