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

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use json_compare::{Error, JsonComparator};

#[doc(hidden)]
#[macro_export]
macro_rules! handle_error {
    ($code:expr, $msg:expr, $($arg:tt)*) => {
        eprintln!($msg, $($arg)*);
        std::process::exit($code);
    };

    ($code:expr, $msg:expr) => {
        eprintln!($msg);
        std::process::exit($code);
    };
}

#[doc(hidden)]
struct Code;

impl Code {
    const SUCCESS: i32 = 0;
    const INTERNAL_ERROR: i32 = 1;
    const INVALID_ARGUMENT: i32 = 2;
    const LOAD_ERROR: i32 = 3;
    const DIFFERENCES_FOUND: i32 = 4;
}

#[doc(hidden)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Direction {
    /// Treat the right document as the one under test
    Right,
    /// Treat the left document as the one under test
    Left,
    /// Run both directions into one log
    Full,
}

#[doc(hidden)]
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Reference JSON document
    left: PathBuf,

    /// JSON document to compare against the reference
    right: PathBuf,

    /// Identity-key spec for array matching, e.g. DATA.cats.<array>.id (repeatable)
    #[clap(short = 'k', long = "match-key")]
    match_keys: Vec<String>,

    /// Path whose scalar mismatches are ignored, e.g. DATA.user.updated_at (repeatable)
    #[clap(short, long = "ignore")]
    ignores: Vec<String>,

    /// Tolerate values that only differ in representation, like 5 vs "5"
    #[clap(short, long)]
    coerce_types: bool,

    /// Comparison direction
    #[clap(short, long, value_enum, default_value = "full")]
    direction: Direction,

    /// Directory to write the diff log into instead of printing it
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print the summary as JSON instead of the text log
    #[clap(long)]
    json: bool,
}

#[doc(hidden)]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut comparator = match JsonComparator::from_files(&cli.left, &cli.right) {
        Ok(comparator) => comparator.with_type_coercion(cli.coerce_types),
        Err(err) => {
            handle_error!(Code::LOAD_ERROR, "Error: {}", err);
        }
    };

    for spec in &cli.match_keys {
        comparator = match comparator.with_match_key(spec) {
            Ok(comparator) => comparator,
            Err(err) => {
                handle_error!(Code::INVALID_ARGUMENT, "Error: {}", err);
            }
        };
    }

    for spec in &cli.ignores {
        comparator = match comparator.with_ignore_path(spec) {
            Ok(comparator) => comparator,
            Err(err) => {
                handle_error!(Code::INVALID_ARGUMENT, "Error: {}", err);
            }
        };
    }

    let result = match cli.direction {
        Direction::Right => comparator.compare_with_right(),
        Direction::Left => comparator.compare_with_left(),
        Direction::Full => comparator.full_compare(),
    };

    match result {
        Ok(()) => {}
        Err(err @ Error::RootKindMismatch { .. }) => {
            handle_error!(Code::INVALID_ARGUMENT, "Error: {}", err);
        }
        Err(err) => {
            handle_error!(Code::INTERNAL_ERROR, "Error: {}", err);
        }
    }

    if let Some(dir) = &cli.output {
        match comparator.save_diff_log(dir) {
            Ok(path) => println!("diff log written to {}", path.display()),
            Err(err) => {
                handle_error!(Code::INTERNAL_ERROR, "Error: {}", err);
            }
        }
    } else if cli.json {
        match serde_json::to_string_pretty(&comparator.summary_record()) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                handle_error!(Code::INTERNAL_ERROR, "Error: {}", err);
            }
        }
    } else {
        println!("{}", comparator.log().join("\n"));
    }

    if comparator.summary_record().total > 0 {
        std::process::exit(Code::DIFFERENCES_FOUND);
    }
    std::process::exit(Code::SUCCESS);
}
