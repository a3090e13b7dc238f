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

use json_compare::JsonComparator;

const LEFT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/left.json");
const RIGHT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/right.json");

fn comparator() -> JsonComparator {
    JsonComparator::from_files(LEFT, RIGHT).expect("fixtures load")
}

#[test]
fn keyed_comparison_with_ignores_and_coercion() {
    let mut cmp = comparator()
        .with_match_key("DATA.users.<array>.id")
        .unwrap()
        .with_ignore_path("DATA.meta.generated_at")
        .unwrap()
        .with_type_coercion(true);
    cmp.compare_with_right().unwrap();

    let record = cmp.summary_record();
    assert_eq!(record.total, 2);
    assert_eq!(record.counts["unequal_value"], 1);
    assert_eq!(record.counts["missing_obj_property"], 1);

    let log = cmp.log().join("\n");
    assert!(log.contains("RIGHT.users.<array>[0].age\nunequal values: expected 34, got 35 instead"));
    assert!(log.contains("RIGHT.users.<array>[0].address.zip\nproperty is missing"));
}

#[test]
fn coercion_off_surfaces_representation_differences() {
    let mut cmp = comparator()
        .with_match_key("DATA.users.<array>.id")
        .unwrap()
        .with_ignore_path("DATA.meta.generated_at")
        .unwrap();
    cmp.compare_with_right().unwrap();

    let record = cmp.summary_record();
    assert_eq!(record.total, 3);
    // "version": 3 vs "3" is now a kind mismatch
    assert_eq!(record.counts["incorrect_type"], 1);
    assert_eq!(record.counts["unequal_value"], 1);
    assert_eq!(record.counts["missing_obj_property"], 1);
}

#[test]
fn positional_comparison_reports_reordering_as_differences() {
    let mut cmp = comparator()
        .with_ignore_path("DATA.meta.generated_at")
        .unwrap()
        .with_type_coercion(true);
    cmp.compare_with_right().unwrap();

    let record = cmp.summary_record();
    assert_eq!(record.counts["unequal_value"], 11);
    assert_eq!(record.counts["arr_with_lack_of_items"], 1);
    assert_eq!(record.counts["exceeding_array_items"], 1);
    assert_eq!(record.counts["missing_obj_property"], 1);
    assert_eq!(record.total, 14);
}

#[test]
fn full_compare_combines_both_directions() {
    let mut cmp = comparator()
        .with_match_key("DATA.users.<array>.id")
        .unwrap()
        .with_ignore_path("DATA.meta.generated_at")
        .unwrap()
        .with_type_coercion(true);
    cmp.full_compare().unwrap();

    let record = cmp.summary_record();
    assert_eq!(record.total, 3);
    assert_eq!(record.counts["unequal_value"], 2);
    assert_eq!(record.counts["missing_obj_property"], 1);

    // the right-as-actual sub-run comes first, then left-as-actual
    let log = cmp.log();
    assert!(log[0].starts_with("RIGHT."));
    assert!(log[2].starts_with("LEFT."));
    assert!(log[2].contains("unequal values: expected 35, got 34 instead"));

    let summary = cmp.summary().unwrap();
    assert!(summary.contains("TOTAL: 3 differences"));
    assert!(summary.contains("-missing_obj_property: 1"));
    assert!(summary.contains("-unequal_value: 2"));
}
