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

use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run before or instead of producing a difference
/// log. Per-node mismatches are never errors; they are reported through the
/// log and counters.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "invalid path spec `{0}`: expected `DATA` followed by `.property` or `.<array>` segments"
    )]
    InvalidPathSpec(String),

    /// Comparison is defined only for object-vs-object or array-vs-array
    /// roots; anything else is a usage error, not a reportable difference.
    #[error("cannot compare document roots: expected side is {expected}, actual side is {actual}")]
    RootKindMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}
